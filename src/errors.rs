//! Custom error types for geoclip
//!
//! Every fallible operation in the crate returns a [`GeoResult`]. The
//! variants are grouped by the stage that failed: reading the source raster,
//! validating tiling parameters, writing tiles, and the vector helpers.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors raised while reading, tiling or writing geospatial data
#[derive(Debug)]
pub enum GeoError {
    /// I/O error
    IoError(io::Error),
    /// Invalid TIFF header
    InvalidHeader,
    /// Invalid byte order marker
    InvalidByteOrder(u16),
    /// Invalid BigTIFF header
    InvalidBigTIFFHeader,
    /// Unsupported TIFF version
    UnsupportedVersion(u16),
    /// Tag not found
    TagNotFound(u16),
    /// Unsupported field type
    UnsupportedFieldType(u16),
    /// Unsupported compression method
    UnsupportedCompression(u64),
    /// Unsupported predictor for the given bits per sample
    UnsupportedPredictor(u64),
    /// Sample layout this crate cannot represent (bits, sample format)
    UnsupportedSampleLayout { bits_per_sample: u16, sample_format: u16 },
    /// More than one band in the source raster
    UnsupportedBandCount(u64),
    /// Image dimensions not found
    MissingDimensions,
    /// Pixel layout that cannot describe a readable band
    InvalidLayout(String),
    /// The source raster could not be opened
    SourceOpen { path: PathBuf, source: Box<GeoError> },
    /// Tile height or width is zero
    InvalidTileSize { height: usize, width: usize },
    /// Overlap is not smaller than both tile dimensions
    InvalidBuffer { buffer: usize, height: usize, width: usize },
    /// Writing a tile failed; the scan was aborted at this tile
    TileWrite { path: PathBuf, source: Box<GeoError> },
    /// GeoJSON could not be parsed
    GeoJson(String),
    /// A feature does not carry the requested property
    MissingFeatureKey { index: usize, key: String },
    /// Coordinate axis other than x or y
    InvalidAxis(String),
    /// Geometry kind not handled by the coordinate accessor
    UnsupportedGeometry(String),
    /// Invalid configuration file or value
    Config(String),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoError::IoError(e) => write!(f, "I/O error: {}", e),
            GeoError::InvalidHeader => write!(f, "Invalid TIFF header"),
            GeoError::InvalidByteOrder(v) => write!(f, "Invalid byte order marker: {:#06x}", v),
            GeoError::InvalidBigTIFFHeader => write!(f, "Invalid BigTIFF header"),
            GeoError::UnsupportedVersion(v) => write!(f, "Unsupported TIFF version: {}", v),
            GeoError::TagNotFound(tag) => write!(f, "Tag not found: {}", tag),
            GeoError::UnsupportedFieldType(ft) => write!(f, "Unsupported field type: {}", ft),
            GeoError::UnsupportedCompression(c) => write!(f, "Unsupported compression method: {}", c),
            GeoError::UnsupportedPredictor(p) => write!(f, "Unsupported predictor: {}", p),
            GeoError::UnsupportedSampleLayout { bits_per_sample, sample_format } => write!(
                f,
                "Unsupported sample layout: {} bits, sample format {}",
                bits_per_sample, sample_format
            ),
            GeoError::UnsupportedBandCount(n) => {
                write!(f, "Only single-band rasters are supported, found {} samples per pixel", n)
            }
            GeoError::MissingDimensions => write!(f, "Image dimensions not found"),
            GeoError::InvalidLayout(msg) => write!(f, "Invalid raster layout: {}", msg),
            GeoError::SourceOpen { path, source } => {
                write!(f, "Failed to open source raster {}: {}", path.display(), source)
            }
            GeoError::InvalidTileSize { height, width } => {
                write!(f, "Invalid tile size {}x{}: both dimensions must be positive", height, width)
            }
            GeoError::InvalidBuffer { buffer, height, width } => write!(
                f,
                "Invalid buffer {}: must be smaller than tile height {} and width {}",
                buffer, height, width
            ),
            GeoError::TileWrite { path, source } => {
                write!(f, "Failed to write tile {}: {}", path.display(), source)
            }
            GeoError::GeoJson(msg) => write!(f, "GeoJSON error: {}", msg),
            GeoError::MissingFeatureKey { index, key } => {
                write!(f, "Feature #{} has no property '{}'", index, key)
            }
            GeoError::InvalidAxis(axis) => write!(
                f,
                "Unknown coordinate '{}'; available coordinates: \"x\" for longitude or \"y\" for latitude",
                axis
            ),
            GeoError::UnsupportedGeometry(kind) => {
                write!(f, "Expected a Point or MultiPoint geometry, got {}", kind)
            }
            GeoError::Config(msg) => write!(f, "Configuration error: {}", msg),
            GeoError::GenericError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for GeoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeoError::IoError(e) => Some(e),
            GeoError::SourceOpen { source, .. } | GeoError::TileWrite { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<io::Error> for GeoError {
    fn from(error: io::Error) -> Self {
        GeoError::IoError(error)
    }
}

impl From<String> for GeoError {
    fn from(msg: String) -> Self {
        GeoError::GenericError(msg)
    }
}

impl From<geojson::Error> for GeoError {
    fn from(error: geojson::Error) -> Self {
        GeoError::GeoJson(error.to_string())
    }
}

/// Result type for geoclip operations
pub type GeoResult<T> = Result<T, GeoError>;
