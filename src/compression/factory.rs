//! Codec selection

use crate::errors::{GeoError, GeoResult};
use crate::tiff::constants::compression;
use super::deflate::DeflateHandler;
use super::handler::CompressionHandler;
use super::uncompressed::UncompressedHandler;
use super::zstd::ZstdHandler;

pub struct CompressionFactory;

impl CompressionFactory {
    /// Handler for a Compression tag value
    pub fn create_handler(code: u64) -> GeoResult<Box<dyn CompressionHandler>> {
        let code16 = u16::try_from(code).map_err(|_| GeoError::UnsupportedCompression(code))?;
        match code16 {
            compression::NONE => Ok(Box::new(UncompressedHandler)),
            compression::DEFLATE | compression::DEFLATE_OLD => Ok(Box::new(DeflateHandler::new())),
            compression::ZSTD | compression::ZSTD_GDAL => Ok(Box::new(ZstdHandler::new())),
            _ => Err(GeoError::UnsupportedCompression(code)),
        }
    }

    /// Handler for a name as accepted on the command line and in config files
    pub fn get_handler_by_name(name: &str) -> GeoResult<Box<dyn CompressionHandler>> {
        match name.to_lowercase().as_str() {
            "none" | "uncompressed" => Ok(Box::new(UncompressedHandler)),
            "deflate" | "zip" => Ok(Box::new(DeflateHandler::new())),
            "zstd" => Ok(Box::new(ZstdHandler::new())),
            _ => Err(GeoError::Config(format!(
                "Unknown compression '{}', expected one of: {}",
                name,
                Self::available_names().join(", ")
            ))),
        }
    }

    pub fn available_names() -> Vec<&'static str> {
        vec!["none", "deflate", "zstd"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_codes_map_to_the_same_codecs() {
        assert_eq!(CompressionFactory::create_handler(32946).unwrap().name(), "deflate");
        assert_eq!(CompressionFactory::create_handler(50000).unwrap().name(), "zstd");
        assert!(matches!(
            CompressionFactory::create_handler(5),
            Err(GeoError::UnsupportedCompression(5))
        ));
    }

    #[test]
    fn codecs_round_trip() {
        let data: Vec<u8> = (0..4096u32).map(|v| (v % 251) as u8).collect();
        for name in CompressionFactory::available_names() {
            let handler = CompressionFactory::get_handler_by_name(name).unwrap();
            let packed = handler.compress(&data).unwrap();
            assert_eq!(handler.decompress(&packed).unwrap(), data, "{}", name);
        }
    }

    #[test]
    fn levels_only_change_the_packed_size() {
        let data = vec![7u8; 8192];
        let fast = DeflateHandler::with_level(1);
        let small = ZstdHandler::with_level(40);
        assert_eq!(fast.decompress(&fast.compress(&data).unwrap()).unwrap(), data);
        assert_eq!(small.decompress(&small.compress(&data).unwrap()).unwrap(), data);
    }

    #[test]
    fn unknown_name_is_a_config_error() {
        assert!(matches!(CompressionFactory::get_handler_by_name("lzw"), Err(GeoError::Config(_))));
    }
}
