//! Named colour ramps

use std::fmt;
use std::str::FromStr;

use crate::errors::GeoError;

/// Set1: nine qualitative classes
const SET1: [[u8; 3]; 9] = [
    [228, 26, 28],
    [55, 126, 184],
    [77, 175, 74],
    [152, 78, 163],
    [255, 127, 0],
    [255, 255, 51],
    [166, 86, 40],
    [247, 129, 191],
    [153, 153, 153],
];

/// Viridis sampled at nine evenly spaced stops
const VIRIDIS: [[u8; 3]; 9] = [
    [68, 1, 84],
    [71, 44, 122],
    [59, 81, 139],
    [44, 113, 142],
    [33, 144, 141],
    [39, 173, 129],
    [92, 200, 99],
    [170, 220, 50],
    [253, 231, 37],
];

/// Greys runs from white at the low end to black at the high end
const GREYS: [[u8; 3]; 2] = [[255, 255, 255], [0, 0, 0]];

/// Colour ramp applied to stretched sample values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colormap {
    #[default]
    Set1,
    Viridis,
    Greys,
}

impl Colormap {
    pub fn names() -> &'static [&'static str] {
        &["set1", "viridis", "greys"]
    }

    /// Colour for a position `t` in [0, 1]; values outside are clamped
    ///
    /// Set1 is qualitative and picks one of its classes. The other ramps
    /// interpolate linearly between neighbouring stops.
    pub fn color_at(&self, t: f64) -> [u8; 3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Colormap::Set1 => {
                let index = ((t * SET1.len() as f64) as usize).min(SET1.len() - 1);
                SET1[index]
            }
            Colormap::Viridis => interpolate(&VIRIDIS, t),
            Colormap::Greys => interpolate(&GREYS, t),
        }
    }
}

fn interpolate(stops: &[[u8; 3]], t: f64) -> [u8; 3] {
    let scaled = t * (stops.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(stops.len() - 1);
    let upper = (lower + 1).min(stops.len() - 1);
    let frac = scaled - lower as f64;

    let mut color = [0u8; 3];
    for (channel, value) in color.iter_mut().enumerate() {
        let a = stops[lower][channel] as f64;
        let b = stops[upper][channel] as f64;
        *value = (a * (1.0 - frac) + b * frac).round() as u8;
    }
    color
}

impl FromStr for Colormap {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "set1" => Ok(Colormap::Set1),
            "viridis" => Ok(Colormap::Viridis),
            "greys" | "grays" => Ok(Colormap::Greys),
            _ => Err(GeoError::Config(format!(
                "Unknown colormap '{}', expected one of: {}",
                s,
                Self::names().join(", ")
            ))),
        }
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Colormap::Set1 => "set1",
            Colormap::Viridis => "viridis",
            Colormap::Greys => "greys",
        };
        write!(f, "{}", name)
    }
}
