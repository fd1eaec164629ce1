//! Splitting a raster band into georeferenced tiles

mod mode;
mod tile;
mod tile_clipper;
#[cfg(test)]
mod tests;

pub use mode::{ClipMode, ClipOptions, ClipOutput, DEFAULT_PREFIX};
pub use tile::Tile;
pub use tile_clipper::TileClipper;
