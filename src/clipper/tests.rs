//! Tests for grid partitioning

use std::collections::HashSet;

use crate::clipper::{ClipMode, ClipOptions, ClipOutput, TileClipper};
use crate::errors::GeoError;
use crate::raster::{Affine, Band, DataType, GeoRaster, SpatialReference};

fn source_transform() -> Affine {
    Affine::new(10.0, 0.0, 600_000.0, 0.0, -10.0, 4_500_000.0)
}

fn clipper_for(rows: usize, cols: usize, value: impl Fn(usize, usize) -> f64) -> TileClipper {
    let values: Vec<f64> = (0..rows * cols).map(|i| value(i / cols, i % cols)).collect();
    let band = Band::from_values(rows, cols, DataType::U16, &values).unwrap();
    TileClipper::from_raster(GeoRaster::new(band, source_transform(), SpatialReference::from_epsg(32631)))
}

fn collect(clipper: &mut TileClipper, options: ClipOptions) -> Vec<(usize, usize, usize, usize)> {
    match clipper.clip(&options.mode(ClipMode::Collect)).unwrap() {
        ClipOutput::Collected(tiles) => tiles.iter().map(|t| (t.row, t.col, t.height(), t.width())).collect(),
        ClipOutput::Written(_) => panic!("collect mode wrote files"),
    }
}

#[test]
fn square_band_splits_into_four_tiles() {
    let mut clipper = clipper_for(1000, 1000, |_, _| 1.0);
    let tiles = collect(&mut clipper, ClipOptions::new(500, 500));
    assert_eq!(
        tiles,
        vec![(0, 0, 500, 500), (0, 500, 500, 500), (500, 0, 500, 500), (500, 500, 500, 500)]
    );
}

#[test]
fn buffered_tiles_are_clipped_at_the_edge() {
    let mut clipper = clipper_for(1000, 1000, |_, _| 1.0);
    let tiles = collect(&mut clipper, ClipOptions::new(600, 600).buffer(100));
    assert_eq!(
        tiles,
        vec![(0, 0, 600, 600), (0, 500, 600, 500), (500, 0, 500, 600), (500, 500, 500, 500)]
    );
}

#[test]
fn tiles_cover_band_with_exact_overlap() {
    let (rows, cols) = (37, 23);
    let mut clipper = clipper_for(rows, cols, |r, c| (r * cols + c) as f64);
    let options = ClipOptions::new(8, 6).buffer(2).mode(ClipMode::Collect);
    let ClipOutput::Collected(tiles) = clipper.clip(&options).unwrap() else {
        panic!("expected collected tiles");
    };

    let mut covered = HashSet::new();
    for tile in tiles {
        assert!(tile.height() <= 8 && tile.width() <= 6);
        for r in 0..tile.height() {
            for c in 0..tile.width() {
                let (sr, sc) = (tile.row + r, tile.col + c);
                assert_eq!(tile.data.sample(r, c), Some((sr * cols + sc) as f64));
                covered.insert((sr, sc));
            }
        }
    }
    assert_eq!(covered.len(), rows * cols);

    let first = &tiles[0];
    let right = tiles.iter().find(|t| t.row == 0 && t.col == 4).unwrap();
    assert_eq!(first.col + first.width() - right.col, 2);
}

#[test]
fn tile_transforms_match_source_pixels() {
    let mut clipper = clipper_for(50, 70, |_, _| 3.0);
    let source = *clipper.transform();
    let options = ClipOptions::new(20, 30).buffer(5).mode(ClipMode::Collect);
    let ClipOutput::Collected(tiles) = clipper.clip(&options).unwrap() else {
        panic!("expected collected tiles");
    };

    for tile in tiles {
        assert_eq!(tile.transform.apply(0.0, 0.0), source.apply(tile.col as f64, tile.row as f64));
        assert_eq!((tile.transform.a, tile.transform.e), (10.0, -10.0));
        assert_eq!(tile.spatial_ref.epsg(), Some(32631));
        assert_eq!(tile.data_type(), DataType::U16);
    }
}

#[test]
fn empty_tile_stops_the_rest_of_its_row() {
    // 4 tile columns per row; tile column 1 of the first row is all zero
    let mut clipper = clipper_for(8, 16, |r, c| if r < 4 && (4..8).contains(&c) { 0.0 } else { 1.0 });
    let tiles = collect(&mut clipper, ClipOptions::new(4, 4).skip_empty(true));

    let first_row: Vec<usize> = tiles.iter().filter(|t| t.0 == 0).map(|t| t.1).collect();
    let second_row: Vec<usize> = tiles.iter().filter(|t| t.0 == 4).map(|t| t.1).collect();
    assert_eq!(first_row, vec![0]);
    assert_eq!(second_row, vec![0, 4, 8, 12]);
}

#[test]
fn empty_tiles_are_kept_without_skip_flag() {
    let mut clipper = clipper_for(4, 8, |_, _| 0.0);
    assert_eq!(collect(&mut clipper, ClipOptions::new(4, 4)).len(), 2);
}

#[test]
fn invalid_parameters_fail_before_scanning() {
    let mut clipper = clipper_for(10, 10, |_, _| 1.0);

    assert!(matches!(
        clipper.clip(&ClipOptions::new(0, 5)),
        Err(GeoError::InvalidTileSize { height: 0, width: 5 })
    ));
    assert!(matches!(
        clipper.clip(&ClipOptions::new(5, 8).buffer(5)),
        Err(GeoError::InvalidBuffer { buffer: 5, .. })
    ));
    assert!(clipper.tiles().is_empty());
}

#[test]
fn collected_tiles_accumulate_across_calls() {
    let mut clipper = clipper_for(10, 10, |_, _| 1.0);
    let options = ClipOptions::new(5, 5).mode(ClipMode::Collect);

    assert_eq!(clipper.clip(&options).unwrap().len(), 4);
    assert_eq!(clipper.clip(&options).unwrap().len(), 8);
    assert_eq!(clipper.take_tiles().len(), 8);
    assert!(clipper.tiles().is_empty());
}

#[test]
fn persisted_tiles_match_collected_tiles() {
    let dir = tempfile::tempdir().unwrap();
    let mut clipper = clipper_for(30, 25, |r, c| (r * 3 + c) as f64);
    let options = ClipOptions::new(16, 10).buffer(4).prefix("scene_").output_dir(dir.path());

    let paths = match clipper.clip(&options).unwrap() {
        ClipOutput::Written(paths) => paths,
        ClipOutput::Collected(_) => panic!("persist mode collected tiles"),
    };
    assert!(clipper.tiles().is_empty());

    let collected = clipper.clip(&options.clone().mode(ClipMode::Collect)).unwrap();
    let ClipOutput::Collected(tiles) = collected else {
        panic!("expected collected tiles");
    };
    assert_eq!(paths.len(), tiles.len());

    for (path, tile) in paths.iter().zip(tiles) {
        assert_eq!(path, &dir.path().join(format!("scene_x_{}_y_{}.tif", tile.col, tile.row)));
        let written = GeoRaster::open(path).unwrap();
        assert_eq!(written.band, tile.data);
        assert_eq!(written.transform, tile.transform);
        assert_eq!(written.spatial_ref, tile.spatial_ref);
    }
}

#[test]
fn write_failure_names_the_tile() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let mut clipper = clipper_for(10, 10, |_, _| 1.0);

    let err = clipper
        .clip(&ClipOptions::new(5, 5).output_dir(&missing))
        .unwrap_err();
    match err {
        GeoError::TileWrite { path, .. } => assert_eq!(path, missing.join("clipped_band_x_0_y_0.tif")),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn open_reports_the_source_path() {
    let err = TileClipper::open("/nonexistent/raster.tif").err().unwrap();
    assert!(matches!(err, GeoError::SourceOpen { .. }));
    assert!(err.to_string().contains("/nonexistent/raster.tif"));
}

#[test]
fn tiles_default_to_the_clipped_band_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let mut clipper = clipper_for(8, 8, |_, _| 1.0);

    let ClipOutput::Written(paths) = clipper.clip(&ClipOptions::new(8, 4).output_dir(dir.path())).unwrap() else {
        panic!("expected written tiles");
    };
    assert_eq!(
        paths,
        vec![
            dir.path().join("clipped_band_x_0_y_0.tif"),
            dir.path().join("clipped_band_x_4_y_0.tif"),
        ]
    );
}
