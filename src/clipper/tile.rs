use std::path::{Path, PathBuf};

use crate::raster::{Affine, Band, DataType, GeoRaster, SpatialReference};

/// One window of the source band with its own georeference
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub data: Band,
    pub transform: Affine,
    pub spatial_ref: SpatialReference,
    /// Column of the tile's top-left pixel in the source band
    pub col: usize,
    /// Row of the tile's top-left pixel in the source band
    pub row: usize,
}

impl Tile {
    pub fn height(&self) -> usize {
        self.data.rows()
    }

    pub fn width(&self) -> usize {
        self.data.cols()
    }

    pub fn data_type(&self) -> DataType {
        self.data.data_type()
    }

    /// `{prefix}x_{col}_y_{row}.tif`
    pub fn file_name(&self, prefix: &str) -> String {
        format!("{}x_{}_y_{}.tif", prefix, self.col, self.row)
    }

    /// Output path for this tile inside `dir`
    pub fn path_in(&self, dir: &Path, prefix: &str) -> PathBuf {
        dir.join(self.file_name(prefix))
    }

    /// The tile as a standalone raster, carrying the source no-data marker
    pub fn into_raster(self, nodata: Option<String>) -> GeoRaster {
        GeoRaster::new(self.data, self.transform, self.spatial_ref).with_nodata(nodata)
    }
}
