//! Georeferenced raster model: bands, sample types, transforms and CRS

pub mod affine;
pub mod band;
pub mod band_reader;
pub mod data_type;
pub mod dataset;
pub mod spatial_ref;
#[cfg(test)]
mod tests;

pub use affine::Affine;
pub use band::Band;
pub use data_type::DataType;
pub use dataset::{GeoRaster, WriteOptions};
pub use spatial_ref::SpatialReference;
