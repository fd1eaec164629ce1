//! Opaque coordinate reference system descriptor
//!
//! The CRS of a GeoTIFF lives in three tags: the GeoKey directory and its
//! double and ASCII parameter stores. Tiles inherit them byte for byte, so
//! the descriptor keeps the tag payloads as read and only interprets them
//! for display.

use std::fmt;

use crate::tiff::constants::{geo_keys, tags};
use crate::tiff::geotags;

/// One key of a GeoKey directory
#[derive(Debug, Clone, PartialEq)]
pub struct GeoKeyEntry {
    pub key_id: u16,
    pub tiff_tag_location: u16,
    pub count: u16,
    pub value_offset: u16,
}

impl GeoKeyEntry {
    pub fn name(&self) -> String {
        geotags::get_key_name(self.key_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpatialReference {
    key_directory: Vec<u16>,
    double_params: Vec<f64>,
    ascii_params: Option<String>,
}

impl SpatialReference {
    pub fn new(key_directory: Vec<u16>, double_params: Vec<f64>, ascii_params: Option<String>) -> Self {
        SpatialReference {
            key_directory,
            double_params,
            ascii_params,
        }
    }

    /// Descriptor for an ungeoreferenced raster
    pub fn empty() -> Self {
        Self::default()
    }

    /// Minimal directory naming a single EPSG code
    ///
    /// Codes in the 4000 range are treated as geographic, everything else
    /// as projected.
    pub fn from_epsg(code: u16) -> Self {
        let geographic = (4000..5000).contains(&code);
        let (model_type, key) = if geographic {
            (2, geo_keys::GEOGRAPHIC_TYPE)
        } else {
            (1, geo_keys::PROJECTED_CS_TYPE)
        };

        let key_directory = vec![
            1, 1, 0, 2,
            geo_keys::GT_MODEL_TYPE, 0, 1, model_type,
            key, 0, 1, code,
        ];
        Self::new(key_directory, Vec::new(), None)
    }

    pub fn is_empty(&self) -> bool {
        self.key_directory.is_empty()
    }

    /// GeoKeyDirectoryTag payload
    pub fn key_directory(&self) -> &[u16] {
        &self.key_directory
    }

    /// GeoDoubleParamsTag payload
    pub fn double_params(&self) -> &[f64] {
        &self.double_params
    }

    /// GeoAsciiParamsTag payload, without the trailing NUL
    pub fn ascii_params(&self) -> Option<&str> {
        self.ascii_params.as_deref()
    }

    /// Parsed key entries; a truncated directory yields the complete ones
    pub fn geo_keys(&self) -> Vec<GeoKeyEntry> {
        if self.key_directory.len() < 4 {
            return Vec::new();
        }
        let declared = self.key_directory[3] as usize;

        self.key_directory[4..]
            .chunks_exact(4)
            .take(declared)
            .map(|k| GeoKeyEntry {
                key_id: k[0],
                tiff_tag_location: k[1],
                count: k[2],
                value_offset: k[3],
            })
            .collect()
    }

    /// Value of a key stored inline in the directory
    pub fn short_value(&self, key_id: u16) -> Option<u16> {
        self.geo_keys()
            .into_iter()
            .find(|k| k.key_id == key_id && k.tiff_tag_location == 0)
            .map(|k| k.value_offset)
    }

    /// Value of a key stored in the ASCII parameters
    pub fn ascii_value(&self, key_id: u16) -> Option<String> {
        let key = self
            .geo_keys()
            .into_iter()
            .find(|k| k.key_id == key_id && k.tiff_tag_location == tags::GEO_ASCII_PARAMS_TAG)?;
        let ascii = self.ascii_params.as_deref()?;
        let start = key.value_offset as usize;
        let end = (start + key.count as usize).min(ascii.len());

        ascii
            .get(start..end)
            .map(|s| s.trim_end_matches(['|', '\0']).to_string())
    }

    /// Value of a key stored in the double parameters
    pub fn double_value(&self, key_id: u16) -> Option<f64> {
        let key = self
            .geo_keys()
            .into_iter()
            .find(|k| k.key_id == key_id && k.tiff_tag_location == tags::GEO_DOUBLE_PARAMS_TAG)?;
        self.double_params.get(key.value_offset as usize).copied()
    }

    /// EPSG code of the projected or geographic CRS, if one is declared
    pub fn epsg(&self) -> Option<u16> {
        [geo_keys::PROJECTED_CS_TYPE, geo_keys::GEOGRAPHIC_TYPE]
            .into_iter()
            .filter_map(|key| self.short_value(key))
            .find(|&code| code != 0 && code != geo_keys::USER_DEFINED)
    }

    /// Short human readable description
    pub fn describe(&self) -> String {
        if self.is_empty() {
            return "none".to_string();
        }
        if let Some(code) = self.epsg() {
            return geotags::get_crs_description(code);
        }

        [geo_keys::PROJ_CITATION, geo_keys::GEOG_CITATION, geo_keys::GT_CITATION]
            .into_iter()
            .find_map(|key| self.ascii_value(key))
            .unwrap_or_else(|| "user-defined".to_string())
    }
}

impl fmt::Display for SpatialReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.describe())?;
        for key in self.geo_keys() {
            let value = match key.tiff_tag_location {
                0 => {
                    let kind = match key.key_id {
                        geo_keys::GT_MODEL_TYPE => Some("model_type"),
                        geo_keys::GT_RASTER_TYPE => Some("raster_type"),
                        geo_keys::GEOG_ANGULAR_UNITS => Some("angular_unit"),
                        geo_keys::PROJ_LINEAR_UNITS => Some("linear_unit"),
                        _ => None,
                    };
                    kind.and_then(|kind| geotags::get_code_name(kind, key.value_offset))
                        .map(|name| format!("{} ({})", key.value_offset, name))
                        .unwrap_or_else(|| key.value_offset.to_string())
                }
                tags::GEO_ASCII_PARAMS_TAG => format!("\"{}\"", self.ascii_value(key.key_id).unwrap_or_default()),
                tags::GEO_DOUBLE_PARAMS_TAG => self
                    .double_value(key.key_id)
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
                other => format!("<tag {}>", other),
            };
            writeln!(f, "  {}: {}", key.name(), value)?;
        }
        Ok(())
    }
}
