//! Property listing over GeoJSON features

use std::fs;
use std::path::Path;

use geojson::{Feature, GeoJson, JsonValue};
use log::{debug, info};

use crate::errors::{GeoError, GeoResult};

/// Reads every feature of a GeoJSON file
///
/// A bare Feature is treated as a collection of one. A bare Geometry has no
/// properties to list and is rejected.
pub fn read_features(path: &Path) -> GeoResult<Vec<Feature>> {
    debug!("Reading features from {}", path.display());
    let text = fs::read_to_string(path)?;

    match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection.features),
        GeoJson::Feature(feature) => Ok(vec![feature]),
        GeoJson::Geometry(_) => Err(GeoError::GeoJson(format!(
            "{} holds a bare geometry, expected features",
            path.display()
        ))),
    }
}

/// Value of `key` for every feature in file order
///
/// Duplicates are kept; see [`unique_values`].
pub fn feature_list(path: &Path, key: &str) -> GeoResult<Vec<JsonValue>> {
    let features = read_features(path)?;

    let values = features
        .iter()
        .enumerate()
        .map(|(index, feature)| {
            feature.property(key).cloned().ok_or_else(|| GeoError::MissingFeatureKey {
                index,
                key: key.to_string(),
            })
        })
        .collect::<GeoResult<Vec<_>>>()?;

    info!("Read '{}' from {} features", key, values.len());
    Ok(values)
}

/// Drops repeated values, keeping the first occurrence of each
pub fn unique_values(values: Vec<JsonValue>) -> Vec<JsonValue> {
    let mut unique: Vec<JsonValue> = Vec::with_capacity(values.len());
    for value in values {
        if !unique.contains(&value) {
            unique.push(value);
        }
    }
    unique
}
