//! TIFF / GeoTIFF container format
//!
//! Structure parsing ([`TiffReader`]), tag constants and GeoKey names, and
//! the single-band writer ([`TiffBuilder`]). Pixel decoding lives in
//! [`crate::raster`].

pub mod ifd;
pub mod types;
pub mod reader;
pub mod geotags;
pub mod builder;
mod builders;
pub mod constants;
pub(crate) mod validation;
#[cfg(test)]
pub(crate) mod tests;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use ifd::{IFD, IFDEntry};
pub use reader::TiffReader;
pub use types::TIFF;
pub use builder::TiffBuilder;
