//! Strip and tile codecs
//!
//! Each supported TIFF compression scheme is a [`CompressionHandler`]; the
//! [`CompressionFactory`] picks one from a tag code or a user-facing name.

mod handler;
mod uncompressed;
mod deflate;
mod factory;
mod zstd;

pub use handler::CompressionHandler;
pub use uncompressed::UncompressedHandler;
pub use deflate::DeflateHandler;
pub use factory::CompressionFactory;
pub use zstd::ZstdHandler;
