use tempfile::tempdir;

use crate::errors::GeoError;
use crate::raster::{Affine, Band, DataType, GeoRaster, SpatialReference, WriteOptions};

fn sample_raster(data_type: DataType) -> GeoRaster {
    let values: Vec<f64> = (0..12 * 9).map(|i| (i % 50) as f64).collect();
    let band = Band::from_values(12, 9, data_type, &values).unwrap();
    GeoRaster::new(
        band,
        Affine::new(0.5, 0.0, 4.25, 0.0, -0.5, 52.0),
        SpatialReference::from_epsg(4326),
    )
}

#[test]
fn raster_survives_a_trip_through_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("band.tif");

    let raster = sample_raster(DataType::F32).with_nodata(Some("-9999".to_string()));
    raster.write(&path, &WriteOptions::default()).unwrap();

    let reopened = GeoRaster::open(&path).unwrap();
    assert_eq!(reopened, raster);
    assert_eq!(reopened.nodata_value(), Some(-9999.0));
    assert_eq!(reopened.spatial_ref.epsg(), Some(4326));
}

#[test]
fn compressed_rasters_read_back_identically() {
    let dir = tempdir().unwrap();

    for compression in ["deflate", "zstd"] {
        let path = dir.path().join(format!("{}.tif", compression));
        let raster = sample_raster(DataType::I16);
        let options = WriteOptions {
            compression: compression.to_string(),
        };
        raster.write(&path, &options).unwrap();

        assert_eq!(GeoRaster::open(&path).unwrap().band, raster.band);
    }
}

#[test]
fn unknown_compression_is_rejected_before_writing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("never.tif");
    let options = WriteOptions {
        compression: "lzw".to_string(),
    };

    assert!(matches!(sample_raster(DataType::U8).write(&path, &options), Err(GeoError::Config(_))));
    assert!(!path.exists());
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let result = GeoRaster::open(&dir.path().join("absent.tif"));
    assert!(matches!(result, Err(GeoError::IoError(_))));
}

#[test]
fn non_numeric_nodata_has_no_value() {
    let raster = sample_raster(DataType::U8).with_nodata(Some("none".to_string()));
    assert_eq!(raster.nodata_value(), None);
}
