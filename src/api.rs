//! High-level entry points
//!
//! [`GeoClip`] bundles the library's operations behind plain method calls.
//! The command-line front end is a thin layer over it.

use std::fs;
use std::path::{Path, PathBuf};

use geojson::JsonValue;
use log::{info, warn};

use crate::clipper::{ClipMode, ClipOptions, ClipOutput, Tile, TileClipper};
use crate::errors::{GeoError, GeoResult};
use crate::preview::{self, Colormap};
use crate::raster::GeoRaster;
use crate::tiff::constants::tags;
use crate::tiff::reader::describe_entry;
use crate::tiff::TiffReader;
use crate::utils::logger::Logger;
use crate::utils::tag_utils;
use crate::vector::{self, Axis};

/// Fallback no-data value for previews of rasters without a no-data tag
pub const DEFAULT_PREVIEW_NODATA: f64 = 0.0;

/// Main interface to the geoclip library
pub struct GeoClip {
    logger: Logger,
    show_progress: bool,
}

impl Default for GeoClip {
    fn default() -> Self {
        GeoClip::new(Logger::disabled())
    }
}

impl GeoClip {
    /// Runs write their summaries to `logger`
    pub fn new(logger: Logger) -> Self {
        GeoClip {
            logger,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Splits `input` into GeoTIFF tiles under `options.output_dir`
    ///
    /// The output directory is created if needed. Returns the written paths
    /// in emission order.
    pub fn clip(&self, input: &Path, options: &ClipOptions) -> GeoResult<Vec<PathBuf>> {
        fs::create_dir_all(&options.output_dir)?;

        let mut clipper = TileClipper::open(input)?.with_progress(self.show_progress);
        let options = options.clone().mode(ClipMode::Persist);
        let paths = match clipper.clip(&options)? {
            ClipOutput::Written(paths) => paths,
            ClipOutput::Collected(_) => Vec::new(),
        };

        self.logger.log(&format!(
            "clip {} -> {} tiles of {}x{} (buffer {}) in {}",
            input.display(),
            paths.len(),
            options.width,
            options.height,
            options.buffer,
            options.output_dir.display()
        ))?;
        Ok(paths)
    }

    /// Splits `input` into tiles kept in memory
    pub fn collect(&self, input: &Path, options: &ClipOptions) -> GeoResult<Vec<Tile>> {
        let mut clipper = TileClipper::open(input)?.with_progress(self.show_progress);
        clipper.clip(&options.clone().mode(ClipMode::Collect))?;
        let tiles = clipper.take_tiles();

        self.logger.log(&format!("collect {} -> {} tiles", input.display(), tiles.len()))?;
        Ok(tiles)
    }

    /// Text report on a raster's structure, georeferencing and values
    ///
    /// With `all_tags`, every tag of the first IFD is listed as well.
    pub fn info(&self, input: &Path, all_tags: bool) -> GeoResult<String> {
        let mut reader = TiffReader::new();
        let tiff = reader.load(input)?;
        let ifd = tiff.main_ifd().ok_or(GeoError::InvalidHeader)?;
        let raster = GeoRaster::open(input)?;
        let (rows, cols) = raster.band.shape();

        let mut lines = vec![
            format!("File: {}", input.display()),
            format!(
                "Format: {}, {}",
                if tiff.is_big_tiff { "BigTIFF" } else { "TIFF" },
                tiff.byte_order.name()
            ),
            format!("Size: {} columns x {} rows", cols, rows),
            format!("Data type: {}", raster.band.data_type()),
        ];
        if let Some(code) = ifd.get_tag_value(tags::COMPRESSION) {
            lines.push(format!("Compression: {}", tag_utils::get_compression_name(code)));
        }
        lines.push(format!("Layout: {}", if ifd.is_tiled() { "tiled" } else { "striped" }));
        lines.push(format!("Transform: {}", raster.transform));
        lines.push(format!("CRS: {}", raster.spatial_ref.describe()));
        for key in raster.spatial_ref.geo_keys() {
            lines.push(format!("  {} = {}", key.name(), key.value_offset));
        }
        lines.push(format!("No-data: {}", raster.nodata.as_deref().unwrap_or("none")));

        let nodata = raster.nodata_value();
        lines.push(match raster.band.min_max(|v| Some(v) != nodata) {
            Some((min, max)) => format!("Range: {} .. {}", min, max),
            None => "Range: no valid samples".to_string(),
        });
        lines.push(format!("Mean: {}", raster.band.mean()));

        if all_tags {
            lines.push("Tags:".to_string());
            lines.extend(ifd.entries.iter().map(|entry| format!("  {}", describe_entry(entry))));
        }

        let mut report = lines.join("\n");
        report.push('\n');

        self.logger.log(&format!("info {}", input.display()))?;
        self.logger.log_spatial_reference(&raster.spatial_ref)?;
        Ok(report)
    }

    /// Property `key` of every feature, optionally without repeats
    pub fn features(&self, input: &Path, key: &str, unique: bool) -> GeoResult<Vec<JsonValue>> {
        let values = vector::feature_list(input, key)?;
        let values = if unique { vector::unique_values(values) } else { values };

        self.logger.log(&format!("features {} '{}' -> {} values", input.display(), key, values.len()))?;
        Ok(values)
    }

    /// Coordinate `axis` of every point feature, in file order
    ///
    /// Features without geometry are skipped with a warning; any other
    /// geometry kind is an error.
    pub fn coordinates(&self, input: &Path, axis: Axis) -> GeoResult<Vec<(usize, f64)>> {
        let features = vector::read_features(input)?;

        let mut coordinates = Vec::with_capacity(features.len());
        for (index, feature) in features.iter().enumerate() {
            let Some(geometry) = &feature.geometry else {
                warn!("Feature #{} has no geometry", index);
                continue;
            };
            coordinates.push((index, vector::point_coordinate(geometry, axis)?));
        }

        self.logger.log(&format!(
            "coordinate {} {} -> {} values",
            input.display(),
            axis,
            coordinates.len()
        ))?;
        Ok(coordinates)
    }

    /// Renders a PNG preview for every raster in `folder` ending in `suffix`
    ///
    /// `nodata` overrides the rasters' own no-data tags. Previews are named
    /// after their source file and written to `output_dir`.
    pub fn preview(
        &self,
        folder: &Path,
        suffix: &str,
        colormap: Colormap,
        nodata: Option<f64>,
        output_dir: &Path,
    ) -> GeoResult<Vec<PathBuf>> {
        fs::create_dir_all(output_dir)?;

        let images = preview::list_images(folder, suffix)?;
        if images.is_empty() {
            warn!("No files ending in '{}' in {}", suffix, folder.display());
        }

        let mut written = Vec::with_capacity(images.len());
        for image_path in &images {
            let raster = GeoRaster::open(image_path)?;
            let nodata = nodata.or_else(|| raster.nodata_value()).unwrap_or(DEFAULT_PREVIEW_NODATA);
            let title = image_path.display().to_string();

            let image = preview::render_band(&raster.band, Some(nodata), colormap, Some(&title));
            let output = preview::preview_path(output_dir, image_path);
            preview::save_png(&image, &output)?;
            written.push(output);
        }

        info!("Rendered {} previews", written.len());
        self.logger.log(&format!("preview {} -> {} images", folder.display(), written.len()))?;
        Ok(written)
    }
}
