//! Tests for the GeoTIFF writer, read back through the reader

use std::io::Cursor;

use crate::raster::{Affine, Band, DataType, GeoRaster, SpatialReference, WriteOptions};
use crate::tiff::constants::{field_types, tags};
use crate::tiff::TiffReader;

fn sample_raster() -> GeoRaster {
    let values: Vec<f64> = (0..20).map(|v| v as f64 * 0.5 - 3.0).collect();
    let band = Band::from_values(4, 5, DataType::F32, &values).unwrap();
    let srs = SpatialReference::new(
        vec![1, 1, 0, 3, 1024, 0, 1, 1, 3072, 0, 1, 32632, 3073, 34737, 12, 0],
        vec![],
        Some("UTM zone 32|".to_string()),
    );
    GeoRaster::new(band, Affine::new(20.0, 0.0, 350_000.0, 0.0, -20.0, 5_600_000.0), srs)
        .with_nodata(Some("-9999".to_string()))
}

fn write_to_memory(raster: &GeoRaster, options: &WriteOptions) -> Cursor<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    raster.to_builder(options).unwrap().write_to(&mut cursor).unwrap();
    cursor.set_position(0);
    cursor
}

#[test]
fn raster_survives_write_and_read() {
    let raster = sample_raster();
    for compression in ["none", "deflate", "zstd"] {
        let options = WriteOptions { compression: compression.to_string() };
        let mut cursor = write_to_memory(&raster, &options);
        let restored = GeoRaster::read(&mut cursor).unwrap();
        assert_eq!(restored, raster, "compression {}", compression);
    }
}

#[test]
fn north_up_transform_uses_scale_and_tiepoint() {
    let mut cursor = write_to_memory(&sample_raster(), &WriteOptions::default());
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();
    let ifd = tiff.main_ifd().unwrap();

    assert!(ifd.has_tag(tags::MODEL_PIXEL_SCALE_TAG));
    assert!(ifd.has_tag(tags::MODEL_TIEPOINT_TAG));
    assert!(!ifd.has_tag(tags::MODEL_TRANSFORMATION_TAG));
    assert_eq!(ifd.get_tag_value(tags::SAMPLE_FORMAT), Some(3));
    assert_eq!(ifd.get_tag_value(tags::BITS_PER_SAMPLE), Some(32));
    let tag_order: Vec<u16> = ifd.entries.iter().map(|e| e.tag).collect();
    let mut sorted = tag_order.clone();
    sorted.sort();
    assert_eq!(tag_order, sorted);
}

#[test]
fn rotated_transform_uses_model_transformation() {
    let mut raster = sample_raster();
    raster.transform = Affine::new(20.0, 1.5, 350_000.0, -1.5, -20.0, 5_600_000.0);
    let mut cursor = write_to_memory(&raster, &WriteOptions::default());

    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();
    assert!(tiff.main_ifd().unwrap().has_tag(tags::MODEL_TRANSFORMATION_TAG));

    let restored = GeoRaster::read(&mut cursor).unwrap();
    assert_eq!(restored.transform, raster.transform);
}

#[test]
fn promoted_builder_writes_bigtiff() {
    let raster = sample_raster();
    let mut builder = raster.to_builder(&WriteOptions::default()).unwrap();
    builder.promote_to_big_tiff();
    let mut cursor = Cursor::new(Vec::new());
    builder.write_to(&mut cursor).unwrap();

    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();
    assert!(tiff.is_big_tiff);
    let offsets = tiff.main_ifd().unwrap().get_entry(tags::STRIP_OFFSETS).unwrap();
    assert_eq!(offsets.field_type, field_types::LONG8);

    let restored = GeoRaster::read(&mut cursor).unwrap();
    assert_eq!(restored, raster);
}

#[test]
fn spatial_reference_tags_are_copied_verbatim() {
    let raster = sample_raster();
    let mut cursor = write_to_memory(&raster, &WriteOptions::default());
    let restored = GeoRaster::read(&mut cursor).unwrap();

    assert_eq!(restored.spatial_ref.key_directory(), raster.spatial_ref.key_directory());
    assert_eq!(restored.spatial_ref.ascii_params(), Some("UTM zone 32|"));
    assert_eq!(restored.nodata_value(), Some(-9999.0));
}
