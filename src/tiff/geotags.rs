//! GeoKey names and code tables
//!
//! Definitions are bundled from `geokeys.toml` and parsed once on first use.

use std::collections::HashMap;

use lazy_static::lazy_static;
use log::warn;

use crate::errors::{GeoError, GeoResult};

lazy_static! {
    static ref GEOKEY_DEFINITIONS: GeoKeyDefinitions = {
        let content = include_str!("../../geokeys.toml");
        GeoKeyDefinitions::parse(content).unwrap_or_else(|e| {
            warn!("Failed to parse GeoKey definitions: {}", e);
            GeoKeyDefinitions::default()
        })
    };
}

/// Lookup tables for GeoKey ids and the codes they take
#[derive(Debug, Default)]
pub struct GeoKeyDefinitions {
    pub key_names: HashMap<u16, String>,
    /// Code tables keyed by table name without the `_codes` suffix
    pub code_tables: HashMap<String, HashMap<u16, String>>,
}

impl GeoKeyDefinitions {
    /// Parses definitions from TOML text
    ///
    /// `[key_ids]` maps key ids to names; every `[<kind>_codes]` table maps
    /// code values to names.
    pub fn parse(content: &str) -> GeoResult<Self> {
        let toml_value: toml::Value = content
            .parse()
            .map_err(|e| GeoError::Config(format!("Failed to parse GeoKey TOML: {}", e)))?;

        let mut defs = GeoKeyDefinitions::default();
        let Some(root) = toml_value.as_table() else {
            return Ok(defs);
        };

        for (name, value) in root {
            let Some(table) = value.as_table() else { continue };
            let parsed = Self::parse_code_table(table);

            if name == "key_ids" {
                defs.key_names = parsed;
            } else if let Some(kind) = name.strip_suffix("_codes") {
                defs.code_tables.insert(kind.to_string(), parsed);
            }
        }

        Ok(defs)
    }

    fn parse_code_table(table: &toml::value::Table) -> HashMap<u16, String> {
        table
            .iter()
            .filter_map(|(k, v)| Some((k.parse::<u16>().ok()?, v.as_str()?.to_string())))
            .collect()
    }

    pub fn key_name(&self, key_id: u16) -> String {
        self.key_names
            .get(&key_id)
            .cloned()
            .unwrap_or_else(|| format!("Unknown-{}", key_id))
    }

    pub fn code_name(&self, kind: &str, code: u16) -> Option<String> {
        self.code_tables.get(kind)?.get(&code).cloned()
    }

    /// Human readable name for an EPSG coordinate system code
    pub fn crs_description(&self, code: u16) -> String {
        if let Some(name) = self
            .code_name("projected_cs", code)
            .or_else(|| self.code_name("geographic_cs", code))
        {
            return format!("{} (EPSG:{})", name, code);
        }

        match code {
            32601..=32660 => format!("WGS 84 / UTM zone {}N (EPSG:{})", code - 32600, code),
            32701..=32760 => format!("WGS 84 / UTM zone {}S (EPSG:{})", code - 32700, code),
            25828..=25838 => format!("ETRS89 / UTM zone {}N (EPSG:{})", code - 25800, code),
            26901..=26923 => format!("NAD83 / UTM zone {}N (EPSG:{})", code - 26900, code),
            _ => format!("EPSG:{}", code),
        }
    }
}

/// Name of a GeoKey id
pub fn get_key_name(key: u16) -> String {
    GEOKEY_DEFINITIONS.key_name(key)
}

/// Name of a code in one of the bundled tables, e.g. `("model_type", 1)`
pub fn get_code_name(kind: &str, code: u16) -> Option<String> {
    GEOKEY_DEFINITIONS.code_name(kind, code)
}

/// Description of an EPSG coordinate system code
pub fn get_crs_description(code: u16) -> String {
    GEOKEY_DEFINITIONS.crs_description(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_definitions_load() {
        assert_eq!(get_key_name(3072), "ProjectedCSTypeGeoKey");
        assert_eq!(get_code_name("model_type", 2).as_deref(), Some("Geographic"));
        assert_eq!(get_crs_description(4326), "WGS 84 (EPSG:4326)");
        assert_eq!(get_crs_description(32633), "WGS 84 / UTM zone 33N (EPSG:32633)");
        assert_eq!(get_crs_description(9999), "EPSG:9999");
    }

    #[test]
    fn unknown_tables_are_ignored() {
        let defs = GeoKeyDefinitions::parse("[key_ids]\n1024 = \"A\"\n[other]\nx = 1\n").unwrap();
        assert_eq!(defs.key_name(1024), "A");
        assert_eq!(defs.key_name(7), "Unknown-7");
        assert!(defs.code_tables.is_empty());
    }
}
