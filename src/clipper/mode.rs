use std::path::{Path, PathBuf};

use crate::clipper::tile::Tile;
use crate::raster::WriteOptions;

/// Tile file name prefix when none is given
pub const DEFAULT_PREFIX: &str = "clipped_band_";

/// What happens to each emitted tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipMode {
    /// Write each tile to its own GeoTIFF as soon as it is cut
    #[default]
    Persist,
    /// Keep tiles in memory on the clipper
    Collect,
}

/// Parameters of one partition run
#[derive(Debug, Clone, PartialEq)]
pub struct ClipOptions {
    pub height: usize,
    pub width: usize,
    /// Pixels shared by neighbouring tiles on both axes
    pub buffer: usize,
    pub mode: ClipMode,
    /// File name prefix in persist mode
    pub prefix: String,
    /// Directory the tiles are written to in persist mode
    pub output_dir: PathBuf,
    /// Stop a row's scan at the first window whose mean is zero
    pub skip_empty: bool,
    pub write_options: WriteOptions,
}

impl ClipOptions {
    pub fn new(height: usize, width: usize) -> Self {
        ClipOptions {
            height,
            width,
            buffer: 0,
            mode: ClipMode::Persist,
            prefix: DEFAULT_PREFIX.to_string(),
            output_dir: PathBuf::from("."),
            skip_empty: false,
            write_options: WriteOptions::default(),
        }
    }

    pub fn buffer(mut self, buffer: usize) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn mode(mut self, mode: ClipMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn skip_empty(mut self, skip_empty: bool) -> Self {
        self.skip_empty = skip_empty;
        self
    }

    pub fn compression(mut self, compression: impl Into<String>) -> Self {
        self.write_options.compression = compression.into();
        self
    }
}

/// Result of a partition run, in emission order
#[derive(Debug)]
pub enum ClipOutput<'a> {
    /// Paths of the tiles written by this run
    Written(Vec<PathBuf>),
    /// Every tile collected on the clipper so far, this run's last
    Collected(&'a [Tile]),
}

impl ClipOutput<'_> {
    pub fn len(&self) -> usize {
        match self {
            ClipOutput::Written(paths) => paths.len(),
            ClipOutput::Collected(tiles) => tiles.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
