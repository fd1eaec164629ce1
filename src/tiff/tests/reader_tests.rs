//! Tests for IFD parsing, tag decoding and band decoding of foreign layouts

use std::io::Cursor;

use crate::compression::{CompressionHandler, DeflateHandler};
use crate::errors::GeoError;
use crate::raster::{Affine, DataType, GeoRaster};
use crate::tiff::constants::tags;
use crate::tiff::TiffReader;
use super::test_utils::{build_be_tiff, build_le_tiff, create_test_bigtiff_buffer, FixtureValue};

fn u8_band_entries(width: u32, height: u32) -> Vec<(u16, FixtureValue)> {
    vec![
        (tags::IMAGE_WIDTH, FixtureValue::Long(vec![width])),
        (tags::IMAGE_LENGTH, FixtureValue::Long(vec![height])),
        (tags::BITS_PER_SAMPLE, FixtureValue::Short(vec![8])),
        (tags::COMPRESSION, FixtureValue::Short(vec![1])),
        (tags::SAMPLES_PER_PIXEL, FixtureValue::Short(vec![1])),
    ]
}

#[test]
fn reads_classic_ifd_entries() {
    let mut entries = u8_band_entries(800, 600);
    entries.push((tags::STRIP_OFFSETS, FixtureValue::PayloadOffsets(vec![0])));
    let mut cursor = build_le_tiff(&entries, &[]);

    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();

    assert!(!tiff.is_big_tiff);
    assert_eq!(tiff.ifd_count(), 1);
    let ifd = tiff.main_ifd().unwrap();
    assert_eq!(ifd.get_dimensions(), Some((800, 600)));
    assert_eq!(ifd.get_samples_per_pixel(), 1);
    assert!(!ifd.is_tiled());
}

#[test]
fn reads_bigtiff_header_and_short_dimension() {
    let mut cursor = create_test_bigtiff_buffer();
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();

    assert!(tiff.is_big_tiff);
    assert!(reader.is_big_tiff());
    assert_eq!(tiff.main_ifd().unwrap().get_dimensions(), Some((1024, 768)));
}

#[test]
fn big_endian_inline_shorts_are_decoded() {
    let entries = vec![
        (tags::IMAGE_WIDTH, FixtureValue::Short(vec![300])),
        (tags::IMAGE_LENGTH, FixtureValue::Short(vec![200])),
        (tags::BITS_PER_SAMPLE, FixtureValue::Short(vec![16])),
        (tags::GEO_KEY_DIRECTORY_TAG, FixtureValue::Short(vec![1, 1, 0, 1, 3072, 0, 1, 32633])),
    ];
    let mut cursor = build_be_tiff(&entries, &[]);

    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();
    let ifd = tiff.main_ifd().unwrap();

    assert_eq!(ifd.get_dimensions(), Some((300, 200)));
    assert_eq!(ifd.get_tag_value(tags::BITS_PER_SAMPLE), Some(16));
    assert_eq!(
        reader.read_tag_u16s(&mut cursor, ifd, tags::GEO_KEY_DIRECTORY_TAG).unwrap(),
        vec![1, 1, 0, 1, 3072, 0, 1, 32633]
    );
}

#[test]
fn ascii_and_double_tags_are_decoded() {
    let mut entries = u8_band_entries(1, 1);
    entries.push((tags::MODEL_PIXEL_SCALE_TAG, FixtureValue::Double(vec![0.5, 0.25, 0.0])));
    entries.push((tags::GDAL_NODATA, FixtureValue::Ascii("-9999".to_string())));
    let mut cursor = build_le_tiff(&entries, &[]);

    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();
    let ifd = tiff.main_ifd().unwrap();

    assert_eq!(
        reader.read_tag_f64s(&mut cursor, ifd, tags::MODEL_PIXEL_SCALE_TAG).unwrap(),
        vec![0.5, 0.25, 0.0]
    );
    assert_eq!(reader.read_tag_ascii(&mut cursor, ifd, tags::GDAL_NODATA).unwrap(), "-9999");
    assert!(matches!(
        reader.read_tag_values(&mut cursor, ifd, tags::TILE_WIDTH),
        Err(GeoError::TagNotFound(322))
    ));
}

#[test]
fn rejects_unknown_version() {
    let mut cursor = Cursor::new(vec![0x49, 0x49, 44, 0, 8, 0, 0, 0]);
    let mut reader = TiffReader::new();
    assert!(matches!(reader.read(&mut cursor), Err(GeoError::UnsupportedVersion(44))));
}

#[test]
fn rejects_ifd_offset_past_end() {
    let mut cursor = Cursor::new(vec![0x49, 0x49, 42, 0, 0xFF, 0, 0, 0]);
    let mut reader = TiffReader::new();
    assert!(reader.read(&mut cursor).is_err());
}

#[test]
fn decodes_multi_strip_u8_band() {
    let payload: Vec<u8> = (0..12).collect();
    let mut entries = u8_band_entries(4, 3);
    entries.push((tags::ROWS_PER_STRIP, FixtureValue::Long(vec![2])));
    entries.push((tags::STRIP_OFFSETS, FixtureValue::PayloadOffsets(vec![0, 8])));
    entries.push((tags::STRIP_BYTE_COUNTS, FixtureValue::Long(vec![8, 4])));
    let mut cursor = build_le_tiff(&entries, &payload);

    let raster = GeoRaster::read(&mut cursor).unwrap();
    assert_eq!(raster.band.shape(), (3, 4));
    assert_eq!(raster.band.as_bytes(), payload.as_slice());
    assert_eq!(raster.transform, Affine::identity());
    assert!(raster.spatial_ref.is_empty());
}

#[test]
fn decodes_big_endian_int16_band_with_tiepoint() {
    let values: [i16; 4] = [-2, 300, 7, -32768];
    let payload: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
    let entries = vec![
        (tags::IMAGE_WIDTH, FixtureValue::Long(vec![2])),
        (tags::IMAGE_LENGTH, FixtureValue::Long(vec![2])),
        (tags::BITS_PER_SAMPLE, FixtureValue::Short(vec![16])),
        (tags::SAMPLE_FORMAT, FixtureValue::Short(vec![2])),
        (tags::STRIP_OFFSETS, FixtureValue::PayloadOffsets(vec![0])),
        (tags::STRIP_BYTE_COUNTS, FixtureValue::Long(vec![8])),
        (tags::MODEL_PIXEL_SCALE_TAG, FixtureValue::Double(vec![10.0, 10.0, 0.0])),
        (tags::MODEL_TIEPOINT_TAG, FixtureValue::Double(vec![0.0, 0.0, 0.0, 1000.0, 2000.0, 0.0])),
    ];
    let mut cursor = build_be_tiff(&entries, &payload);

    let raster = GeoRaster::read(&mut cursor).unwrap();
    assert_eq!(raster.band.data_type(), DataType::I16);
    let decoded: Vec<f64> = raster.band.values().collect();
    assert_eq!(decoded, vec![-2.0, 300.0, 7.0, -32768.0]);
    assert_eq!(raster.transform, Affine::new(10.0, 0.0, 1000.0, 0.0, -10.0, 2000.0));
}

#[test]
fn decodes_deflate_tiles_with_predictor() {
    // 3x3 image in 2x2 tiles; edge tiles are padded to full size
    let image: [[u16; 3]; 3] = [[1, 2, 3], [4, 5, 6], [7, 8, 9]];
    let mut payload = Vec::new();
    let mut offsets = Vec::new();
    let mut counts = Vec::new();
    for tile_row in 0..2 {
        for tile_col in 0..2 {
            let mut tile = Vec::new();
            for r in 0..2 {
                let mut prev = 0u16;
                for c in 0..2 {
                    let (y, x) = (tile_row * 2 + r, tile_col * 2 + c);
                    let value = if y < 3 && x < 3 { image[y][x] } else { 0 };
                    tile.extend_from_slice(&value.wrapping_sub(prev).to_le_bytes());
                    prev = value;
                }
            }
            let packed = DeflateHandler::new().compress(&tile).unwrap();
            offsets.push(payload.len() as u32);
            counts.push(packed.len() as u32);
            payload.extend_from_slice(&packed);
        }
    }

    let entries = vec![
        (tags::IMAGE_WIDTH, FixtureValue::Long(vec![3])),
        (tags::IMAGE_LENGTH, FixtureValue::Long(vec![3])),
        (tags::BITS_PER_SAMPLE, FixtureValue::Short(vec![16])),
        (tags::COMPRESSION, FixtureValue::Short(vec![8])),
        (tags::PREDICTOR, FixtureValue::Short(vec![2])),
        (tags::TILE_WIDTH, FixtureValue::Long(vec![2])),
        (tags::TILE_LENGTH, FixtureValue::Long(vec![2])),
        (tags::TILE_OFFSETS, FixtureValue::PayloadOffsets(offsets)),
        (tags::TILE_BYTE_COUNTS, FixtureValue::Long(counts)),
    ];
    let mut cursor = build_le_tiff(&entries, &payload);

    let raster = GeoRaster::read(&mut cursor).unwrap();
    let decoded: Vec<f64> = raster.band.values().collect();
    assert_eq!(decoded, (1..=9).map(|v| v as f64).collect::<Vec<_>>());
}

#[test]
fn multi_band_rasters_are_rejected() {
    let mut entries = u8_band_entries(2, 2);
    entries.retain(|(tag, _)| *tag != tags::SAMPLES_PER_PIXEL);
    entries.push((tags::SAMPLES_PER_PIXEL, FixtureValue::Short(vec![3])));
    entries.push((tags::STRIP_OFFSETS, FixtureValue::PayloadOffsets(vec![0])));
    entries.push((tags::STRIP_BYTE_COUNTS, FixtureValue::Long(vec![12])));
    let mut cursor = build_le_tiff(&entries, &[0u8; 12]);

    assert!(matches!(GeoRaster::read(&mut cursor), Err(GeoError::UnsupportedBandCount(3))));
}

#[test]
fn unsupported_compression_is_reported() {
    let mut entries = u8_band_entries(2, 2);
    entries.retain(|(tag, _)| *tag != tags::COMPRESSION);
    entries.push((tags::COMPRESSION, FixtureValue::Short(vec![5])));
    entries.push((tags::STRIP_OFFSETS, FixtureValue::PayloadOffsets(vec![0])));
    entries.push((tags::STRIP_BYTE_COUNTS, FixtureValue::Long(vec![4])));
    let mut cursor = build_le_tiff(&entries, &[0u8; 4]);

    assert!(matches!(GeoRaster::read(&mut cursor), Err(GeoError::UnsupportedCompression(5))));
}

#[test]
fn zero_width_tiled_image_is_rejected() {
    let entries = vec![
        (tags::IMAGE_WIDTH, FixtureValue::Long(vec![0])),
        (tags::IMAGE_LENGTH, FixtureValue::Long(vec![16])),
        (tags::BITS_PER_SAMPLE, FixtureValue::Short(vec![8])),
        (tags::TILE_WIDTH, FixtureValue::Long(vec![16])),
        (tags::TILE_LENGTH, FixtureValue::Long(vec![16])),
        (tags::TILE_OFFSETS, FixtureValue::PayloadOffsets(vec![0])),
        (tags::TILE_BYTE_COUNTS, FixtureValue::Long(vec![256])),
    ];
    let mut cursor = build_le_tiff(&entries, &[0u8; 256]);

    assert!(matches!(GeoRaster::read(&mut cursor), Err(GeoError::InvalidLayout(_))));
}

#[test]
fn overflowing_dimensions_are_rejected() {
    let entries = vec![
        (tags::IMAGE_WIDTH, FixtureValue::Long(vec![u32::MAX])),
        (tags::IMAGE_LENGTH, FixtureValue::Long(vec![u32::MAX])),
        (tags::BITS_PER_SAMPLE, FixtureValue::Short(vec![64])),
        (tags::SAMPLE_FORMAT, FixtureValue::Short(vec![3])),
        (tags::STRIP_OFFSETS, FixtureValue::PayloadOffsets(vec![0])),
        (tags::STRIP_BYTE_COUNTS, FixtureValue::Long(vec![8])),
    ];
    let mut cursor = build_le_tiff(&entries, &[0u8; 8]);

    assert!(matches!(GeoRaster::read(&mut cursor), Err(GeoError::InvalidLayout(_))));
}

#[test]
fn huge_header_in_a_small_file_fails_on_the_first_strip() {
    let entries = vec![
        (tags::IMAGE_WIDTH, FixtureValue::Long(vec![100_000])),
        (tags::IMAGE_LENGTH, FixtureValue::Long(vec![100_000])),
        (tags::BITS_PER_SAMPLE, FixtureValue::Short(vec![64])),
        (tags::SAMPLE_FORMAT, FixtureValue::Short(vec![3])),
        (tags::STRIP_OFFSETS, FixtureValue::PayloadOffsets(vec![0])),
        (tags::STRIP_BYTE_COUNTS, FixtureValue::Long(vec![64])),
    ];
    let mut cursor = build_le_tiff(&entries, &[0u8; 64]);

    assert!(GeoRaster::read(&mut cursor).is_err());
}

#[test]
fn missing_strips_are_an_error() {
    let mut entries = u8_band_entries(4, 4);
    entries.push((tags::ROWS_PER_STRIP, FixtureValue::Long(vec![2])));
    entries.push((tags::STRIP_OFFSETS, FixtureValue::PayloadOffsets(vec![0])));
    entries.push((tags::STRIP_BYTE_COUNTS, FixtureValue::Long(vec![8])));
    let mut cursor = build_le_tiff(&entries, &[7u8; 8]);

    assert!(matches!(GeoRaster::read(&mut cursor), Err(GeoError::InvalidLayout(_))));
}

#[test]
fn sparse_tiles_decode_as_zero() {
    let entries = vec![
        (tags::IMAGE_WIDTH, FixtureValue::Long(vec![3])),
        (tags::IMAGE_LENGTH, FixtureValue::Long(vec![2])),
        (tags::BITS_PER_SAMPLE, FixtureValue::Short(vec![8])),
        (tags::TILE_WIDTH, FixtureValue::Long(vec![2])),
        (tags::TILE_LENGTH, FixtureValue::Long(vec![2])),
        (tags::TILE_OFFSETS, FixtureValue::PayloadOffsets(vec![0, 0])),
        (tags::TILE_BYTE_COUNTS, FixtureValue::Long(vec![4, 0])),
    ];
    let mut cursor = build_le_tiff(&entries, &[1, 2, 3, 4]);

    let raster = GeoRaster::read(&mut cursor).unwrap();
    assert_eq!(raster.band.as_bytes(), &[1, 2, 0, 3, 4, 0]);
}
