//! End-to-end tests against files in a temporary directory

use std::fs;
use std::path::{Path, PathBuf};

use geojson::JsonValue;
use tempfile::tempdir;

use geoclip::config::ClipConfig;
use geoclip::preview::Colormap;
use geoclip::tiff::constants::tags;
use geoclip::vector::Axis;
use geoclip::{Affine, Band, ClipOptions, DataType, GeoClip, GeoError, GeoRaster, SpatialReference, TiffReader};

const ROWS: usize = 100;
const COLS: usize = 120;

fn source_value(row: usize, col: usize) -> f64 {
    ((row * 7 + col * 3) % 200) as f64
}

fn write_source(dir: &Path) -> (PathBuf, GeoRaster) {
    let values: Vec<f64> = (0..ROWS * COLS).map(|i| source_value(i / COLS, i % COLS)).collect();
    let raster = GeoRaster::new(
        Band::from_values(ROWS, COLS, DataType::U8, &values).unwrap(),
        Affine::new(30.0, 0.0, 500_000.0, 0.0, -30.0, 5_800_000.0),
        SpatialReference::from_epsg(32633),
    )
    .with_nodata(Some("255".to_string()));

    let path = dir.join("scene.tif");
    raster.write(&path, &Default::default()).unwrap();
    (path, raster)
}

#[test]
fn clip_writes_georeferenced_tiles() {
    let dir = tempdir().unwrap();
    let (source_path, source) = write_source(dir.path());
    let out = dir.path().join("tiles");

    let options = ClipOptions::new(60, 70).buffer(10).prefix("scene_").output_dir(&out);
    let paths = GeoClip::default().clip(&source_path, &options).unwrap();

    let names: Vec<String> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "scene_x_0_y_0.tif",
            "scene_x_60_y_0.tif",
            "scene_x_0_y_50.tif",
            "scene_x_60_y_50.tif",
        ]
    );

    let tile = GeoRaster::open(&out.join("scene_x_60_y_50.tif")).unwrap();
    assert_eq!(tile.band.shape(), (50, 60));
    assert_eq!(tile.band.data_type(), DataType::U8);
    assert_eq!(tile.band.sample(0, 0), Some(source_value(50, 60)));
    assert_eq!(tile.band.sample(49, 59), Some(source_value(99, 119)));
    assert_eq!(tile.transform.apply(0.0, 0.0), source.transform.apply(60.0, 50.0));
    assert_eq!(tile.spatial_ref, source.spatial_ref);
    assert_eq!(tile.nodata.as_deref(), Some("255"));
}

#[test]
fn tiles_are_plain_single_ifd_geotiffs() {
    let dir = tempdir().unwrap();
    let (source_path, _) = write_source(dir.path());

    let options = ClipOptions::new(100, 120).output_dir(dir.path().join("whole")).compression("deflate");
    let paths = GeoClip::default().clip(&source_path, &options).unwrap();
    assert_eq!(paths.len(), 1);

    let mut reader = TiffReader::new();
    let tiff = reader.load(&paths[0]).unwrap();
    assert_eq!(reader.get_file_path(), Some(paths[0].as_path()));
    assert_eq!(tiff.ifd_count(), 1);
    let ifd = tiff.main_ifd().unwrap();
    assert_eq!(ifd.get_dimensions(), Some((120, 100)));
    assert_eq!(ifd.get_tag_value(tags::COMPRESSION), Some(8));
    assert!(ifd.has_tag(tags::MODEL_PIXEL_SCALE_TAG));
    assert!(ifd.has_tag(tags::GEO_KEY_DIRECTORY_TAG));
}

#[test]
fn collect_matches_the_source() {
    let dir = tempdir().unwrap();
    let (source_path, source) = write_source(dir.path());

    let tiles = GeoClip::default().collect(&source_path, &ClipOptions::new(40, 40)).unwrap();
    assert_eq!(tiles.len(), 9);
    for tile in &tiles {
        assert_eq!(tile.data, source.band.window(tile.row, tile.col, 40, 40));
    }
}

#[test]
fn missing_source_is_reported_with_its_path() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nowhere.tif");

    match GeoClip::default().clip(&missing, &ClipOptions::new(10, 10).output_dir(dir.path())) {
        Err(GeoError::SourceOpen { path, .. }) => assert_eq!(path, missing),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn info_describes_the_raster() {
    let dir = tempdir().unwrap();
    let (source_path, _) = write_source(dir.path());

    let report = GeoClip::default().info(&source_path, true).unwrap();
    assert!(report.contains("Size: 120 columns x 100 rows"));
    assert!(report.contains("Data type: uint8"));
    assert!(report.contains("EPSG:32633"));
    assert!(report.contains("No-data: 255"));
    assert!(report.contains("Range: 0 .. 199"));
    assert!(report.contains("ImageWidth"));

    let lines: Vec<&str> = report.lines().collect();
    assert!(lines[0].starts_with("File: "));
    assert!(lines.contains(&"No-data: 255"));
    assert!(report.ends_with('\n'));
}

#[test]
fn vector_helpers_read_geojson_files() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wells.geojson");
    fs::write(
        &path,
        r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"site": "A"},
                 "geometry": {"type": "Point", "coordinates": [19.9, 50.05]}},
                {"type": "Feature", "properties": {"site": "B"},
                 "geometry": {"type": "MultiPoint", "coordinates": [[18.6, 54.35], [18.7, 54.4]]}},
                {"type": "Feature", "properties": {"site": "A"}, "geometry": null}
            ]
        }"#,
    )
    .unwrap();

    let api = GeoClip::default();
    assert_eq!(
        api.features(&path, "site", true).unwrap(),
        vec![JsonValue::from("A"), JsonValue::from("B")]
    );
    assert_eq!(api.features(&path, "site", false).unwrap().len(), 3);
    assert_eq!(api.coordinates(&path, Axis::Y).unwrap(), vec![(0, 50.05), (1, 54.35)]);
}

#[test]
fn previews_are_rendered_for_matching_files() {
    let dir = tempdir().unwrap();
    write_source(dir.path());
    fs::write(dir.path().join("readme.txt"), "not a raster").unwrap();
    let out = dir.path().join("png");

    let written = GeoClip::default()
        .preview(dir.path(), ".tif", Colormap::Viridis, None, &out)
        .unwrap();
    assert_eq!(written, vec![out.join("scene.png")]);

    let png = image::open(&written[0]).unwrap().to_rgba8();
    assert_eq!(png.height(), ROWS as u32);
    assert!(png.width() > COLS as u32);
}

#[test]
fn config_file_supplies_clip_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("clip.toml");
    fs::write(&path, "[clip]\nheight = 32\nwidth = 48\nbuffer = 8\nprefix = \"t_\"\n").unwrap();

    let config = ClipConfig::load(&path).unwrap().merge(ClipConfig {
        buffer: Some(4),
        ..Default::default()
    });
    let options = config.to_options().unwrap();
    assert_eq!((options.height, options.width, options.buffer), (32, 48, 4));
    assert_eq!(options.prefix, "t_");
}
