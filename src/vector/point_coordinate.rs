//! Coordinate access on point geometries

use std::fmt;
use std::str::FromStr;

use geojson::{Geometry, Value};

use crate::errors::{GeoError, GeoResult};

/// Coordinate component of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Longitude / easting
    X,
    /// Latitude / northing
    Y,
}

impl Axis {
    fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}

impl FromStr for Axis {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            other => Err(GeoError::InvalidAxis(other.to_string())),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// The `axis` coordinate of a Point, or of the first point of a MultiPoint
pub fn point_coordinate(geometry: &Geometry, axis: Axis) -> GeoResult<f64> {
    let position = match &geometry.value {
        Value::Point(position) => position,
        Value::MultiPoint(points) => points
            .first()
            .ok_or_else(|| GeoError::UnsupportedGeometry("an empty MultiPoint".to_string()))?,
        other => return Err(GeoError::UnsupportedGeometry(geometry_kind(other).to_string())),
    };

    position.get(axis.index()).copied().ok_or_else(|| {
        GeoError::GeoJson(format!("Position has {} values, no {} coordinate", position.len(), axis))
    })
}

fn geometry_kind(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}
