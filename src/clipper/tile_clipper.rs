//! Grid partitioning of a single band
//!
//! The scan is row-major. Both axes advance by `dimension - buffer`, so
//! neighbouring tiles share exactly `buffer` pixels, and windows that run
//! past the bottom or right edge are cut short rather than padded.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::clipper::mode::{ClipMode, ClipOptions, ClipOutput};
use crate::clipper::tile::Tile;
use crate::errors::{GeoError, GeoResult};
use crate::raster::{Affine, Band, GeoRaster, SpatialReference};
use crate::utils::progress::ProgressTracker;

pub struct TileClipper {
    source: GeoRaster,
    source_path: Option<PathBuf>,
    /// Tiles gathered in collect mode, across every call
    tiles: Vec<Tile>,
    show_progress: bool,
}

impl TileClipper {
    /// Opens a raster and loads its first band into memory
    pub fn open(path: impl AsRef<Path>) -> GeoResult<Self> {
        let path = path.as_ref();
        let source = GeoRaster::open(path).map_err(|e| GeoError::SourceOpen {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        let (rows, cols) = source.band.shape();
        info!(
            "Loaded {}: {}x{} {}, CRS {}",
            path.display(),
            cols,
            rows,
            source.band.data_type(),
            source.spatial_ref.describe()
        );

        Ok(TileClipper {
            source,
            source_path: Some(path.to_path_buf()),
            tiles: Vec::new(),
            show_progress: false,
        })
    }

    /// Wraps a raster that is already in memory
    pub fn from_raster(source: GeoRaster) -> Self {
        TileClipper {
            source,
            source_path: None,
            tiles: Vec::new(),
            show_progress: false,
        }
    }

    /// Draws a progress bar on stderr while clipping
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn band(&self) -> &Band {
        &self.source.band
    }

    pub fn transform(&self) -> &Affine {
        &self.source.transform
    }

    pub fn spatial_ref(&self) -> &SpatialReference {
        &self.source.spatial_ref
    }

    pub fn nodata(&self) -> Option<&str> {
        self.source.nodata.as_deref()
    }

    /// Tiles collected so far
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Empties the collect-mode accumulator, returning its tiles
    pub fn take_tiles(&mut self) -> Vec<Tile> {
        std::mem::take(&mut self.tiles)
    }

    /// Checks tile size and overlap before any scanning
    pub fn validate(options: &ClipOptions) -> GeoResult<()> {
        if options.height == 0 || options.width == 0 {
            return Err(GeoError::InvalidTileSize {
                height: options.height,
                width: options.width,
            });
        }
        if options.buffer >= options.height.min(options.width) {
            return Err(GeoError::InvalidBuffer {
                buffer: options.buffer,
                height: options.height,
                width: options.width,
            });
        }
        Ok(())
    }

    /// Number of tiles a scan without empty-tile skipping would emit
    pub fn expected_tile_count(&self, options: &ClipOptions) -> GeoResult<usize> {
        Self::validate(options)?;
        let (rows, cols) = self.source.band.shape();
        Ok(grid_starts(rows, options.height - options.buffer) * grid_starts(cols, options.width - options.buffer))
    }

    /// Partitions the band and emits every tile
    ///
    /// With `skip_empty`, the first window whose mean is exactly zero ends
    /// the scan of its row: later windows in that row are never looked at.
    /// A failed write stops the scan; tiles written before it remain.
    pub fn clip(&mut self, options: &ClipOptions) -> GeoResult<ClipOutput<'_>> {
        let expected = self.expected_tile_count(options)?;
        let row_stride = options.height - options.buffer;
        let col_stride = options.width - options.buffer;

        let source = &self.source;
        let (rows, cols) = source.band.shape();
        let row_tiles = grid_starts(cols, col_stride);

        info!(
            "Clipping {}x{} band into {}x{} tiles (buffer {}, up to {} tiles)",
            cols, rows, options.width, options.height, options.buffer, expected
        );

        let progress = if self.show_progress {
            ProgressTracker::new(expected as u64, "Clipping")
        } else {
            ProgressTracker::hidden()
        };

        let mut written = Vec::new();
        let mut row = 0;
        while row < rows {
            progress.set_message(&format!("row y={}", row));
            let mut col = 0;
            let mut visited = 0;
            while col < cols {
                let window = source.band.window(row, col, options.height, options.width);

                if options.skip_empty && window.mean() == 0.0 {
                    warn!("Empty frame at x={} y={}, skipping the rest of the row", col, row);
                    break;
                }

                let tile = Tile {
                    data: window,
                    transform: source.transform.for_window(col, row),
                    spatial_ref: source.spatial_ref.clone(),
                    col,
                    row,
                };

                match options.mode {
                    ClipMode::Persist => {
                        let path = tile.path_in(&options.output_dir, &options.prefix);
                        tile.into_raster(source.nodata.clone())
                            .write(&path, &options.write_options)
                            .map_err(|e| GeoError::TileWrite {
                                path: path.clone(),
                                source: Box::new(e),
                            })?;
                        info!("Wrote tile {}", path.display());
                        written.push(path);
                    }
                    ClipMode::Collect => {
                        debug!("Collected tile x={} y={} ({}x{})", col, row, tile.width(), tile.height());
                        self.tiles.push(tile);
                    }
                }

                progress.increment(1);
                visited += 1;
                col += col_stride;
            }

            progress.increment((row_tiles - visited.min(row_tiles)) as u64);
            row += row_stride;
        }

        progress.finish("Clipping complete");

        Ok(match options.mode {
            ClipMode::Persist => {
                info!("Wrote {} tiles", written.len());
                ClipOutput::Written(written)
            }
            ClipMode::Collect => {
                info!("Holding {} collected tiles", self.tiles.len());
                ClipOutput::Collected(&self.tiles)
            }
        })
    }
}

/// Number of window starts along an axis of `len` pixels
fn grid_starts(len: usize, stride: usize) -> usize {
    if len == 0 {
        0
    } else {
        (len - 1) / stride + 1
    }
}
