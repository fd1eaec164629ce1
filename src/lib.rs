pub mod errors;
pub mod io;
pub mod tiff;
pub mod compression;
pub mod raster;
pub mod clipper;
pub mod vector;
pub mod preview;
pub mod config;
pub mod utils;
pub mod commands;
pub mod api;

pub use crate::api::GeoClip;
pub use crate::errors::{GeoError, GeoResult};

pub use clipper::{ClipMode, ClipOptions, ClipOutput, Tile, TileClipper};
pub use raster::{Affine, Band, DataType, GeoRaster, SpatialReference, WriteOptions};
pub use tiff::TiffReader;
