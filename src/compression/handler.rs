//! Codec trait shared by the reader and the writer

use crate::errors::GeoResult;

/// Strategy for one TIFF compression scheme
pub trait CompressionHandler: Send + Sync {
    /// Decodes one strip or tile
    fn decompress(&self, data: &[u8]) -> GeoResult<Vec<u8>>;

    /// Encodes one strip or tile
    fn compress(&self, data: &[u8]) -> GeoResult<Vec<u8>>;

    fn name(&self) -> &'static str;

    /// Value written to the Compression tag
    fn code(&self) -> u16;
}
