//! Clip defaults from a TOML file
//!
//! ```toml
//! [clip]
//! height = 512
//! width = 512
//! buffer = 32
//! prefix = "scene_"
//! output_dir = "tiles"
//! skip_empty = true
//! compression = "deflate"
//! ```
//!
//! Every key is optional. Command-line flags are merged on top with
//! [`ClipConfig::merge`].

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::clipper::ClipOptions;
use crate::errors::{GeoError, GeoResult};

const KNOWN_KEYS: [&str; 7] = ["height", "width", "buffer", "prefix", "output_dir", "skip_empty", "compression"];

/// Partially specified clip parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipConfig {
    pub height: Option<usize>,
    pub width: Option<usize>,
    pub buffer: Option<usize>,
    pub prefix: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub skip_empty: Option<bool>,
    pub compression: Option<String>,
}

impl ClipConfig {
    pub fn load(path: &Path) -> GeoResult<Self> {
        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses the `[clip]` table; a file without one yields all defaults
    pub fn parse(content: &str) -> GeoResult<Self> {
        let toml_value: toml::Value = content
            .parse()
            .map_err(|e| GeoError::Config(format!("Failed to parse configuration: {}", e)))?;

        let Some(table) = toml_value.get("clip") else {
            return Ok(Self::default());
        };
        let table = table
            .as_table()
            .ok_or_else(|| GeoError::Config("[clip] must be a table".to_string()))?;

        for key in table.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                warn!("Ignoring unknown [clip] key '{}'", key);
            }
        }

        Ok(ClipConfig {
            height: size_value(table, "height")?,
            width: size_value(table, "width")?,
            buffer: size_value(table, "buffer")?,
            prefix: string_value(table, "prefix")?,
            output_dir: string_value(table, "output_dir")?.map(PathBuf::from),
            skip_empty: bool_value(table, "skip_empty")?,
            compression: string_value(table, "compression")?,
        })
    }

    /// Overlays `overrides` on top of `self`; set fields of `overrides` win
    pub fn merge(self, overrides: ClipConfig) -> ClipConfig {
        ClipConfig {
            height: overrides.height.or(self.height),
            width: overrides.width.or(self.width),
            buffer: overrides.buffer.or(self.buffer),
            prefix: overrides.prefix.or(self.prefix),
            output_dir: overrides.output_dir.or(self.output_dir),
            skip_empty: overrides.skip_empty.or(self.skip_empty),
            compression: overrides.compression.or(self.compression),
        }
    }

    /// Builds clip options; tile height and width must be known by now
    pub fn to_options(&self) -> GeoResult<ClipOptions> {
        let height = self
            .height
            .ok_or_else(|| GeoError::Config("Tile height not given on the command line or in the config".to_string()))?;
        let width = self
            .width
            .ok_or_else(|| GeoError::Config("Tile width not given on the command line or in the config".to_string()))?;

        let mut options = ClipOptions::new(height, width)
            .buffer(self.buffer.unwrap_or(0))
            .skip_empty(self.skip_empty.unwrap_or(false));
        if let Some(prefix) = &self.prefix {
            options = options.prefix(prefix.as_str());
        }
        if let Some(dir) = &self.output_dir {
            options = options.output_dir(dir);
        }
        if let Some(compression) = &self.compression {
            options = options.compression(compression.as_str());
        }
        Ok(options)
    }
}

fn size_value(table: &toml::value::Table, key: &str) -> GeoResult<Option<usize>> {
    match table.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_integer()
            .and_then(|v| usize::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| GeoError::Config(format!("[clip] {} must be a non-negative integer", key))),
    }
}

fn string_value(table: &toml::value::Table, key: &str) -> GeoResult<Option<String>> {
    match table.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| GeoError::Config(format!("[clip] {} must be a string", key))),
    }
}

fn bool_value(table: &toml::value::Table, key: &str) -> GeoResult<Option<bool>> {
    match table.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_bool()
            .map(Some)
            .ok_or_else(|| GeoError::Config(format!("[clip] {} must be true or false", key))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipper::ClipMode;

    #[test]
    fn full_table_is_read() {
        let config = ClipConfig::parse(
            r#"
            [clip]
            height = 256
            width = 128
            buffer = 16
            prefix = "s2_"
            output_dir = "out/tiles"
            skip_empty = true
            compression = "zstd"
            "#,
        )
        .unwrap();

        let options = config.to_options().unwrap();
        assert_eq!((options.height, options.width, options.buffer), (256, 128, 16));
        assert_eq!(options.prefix, "s2_");
        assert_eq!(options.output_dir, PathBuf::from("out/tiles"));
        assert!(options.skip_empty);
        assert_eq!(options.write_options.compression, "zstd");
        assert_eq!(options.mode, ClipMode::Persist);
    }

    #[test]
    fn missing_table_gives_defaults() {
        assert_eq!(ClipConfig::parse("[preview]\nsuffix = \".tif\"").unwrap(), ClipConfig::default());
    }

    #[test]
    fn command_line_values_win() {
        let file = ClipConfig::parse("[clip]\nheight = 100\nwidth = 100\nbuffer = 10").unwrap();
        let flags = ClipConfig {
            width: Some(50),
            ..ClipConfig::default()
        };

        let merged = file.merge(flags);
        assert_eq!(merged.height, Some(100));
        assert_eq!(merged.width, Some(50));
        assert_eq!(merged.buffer, Some(10));
    }

    #[test]
    fn dimensions_are_required() {
        let config = ClipConfig {
            height: Some(10),
            ..ClipConfig::default()
        };
        assert!(matches!(config.to_options(), Err(GeoError::Config(_))));
    }

    #[test]
    fn wrong_types_are_config_errors() {
        assert!(matches!(ClipConfig::parse("[clip]\nheight = -5"), Err(GeoError::Config(_))));
        assert!(matches!(ClipConfig::parse("[clip]\nskip_empty = \"yes\""), Err(GeoError::Config(_))));
        assert!(matches!(ClipConfig::parse("clip = 3"), Err(GeoError::Config(_))));
        assert!(matches!(ClipConfig::parse("[clip"), Err(GeoError::Config(_))));
    }
}
