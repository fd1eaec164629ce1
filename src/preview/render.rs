//! Band to PNG rendering

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgba, RgbaImage};
use log::{debug, info, warn};

use crate::errors::{GeoError, GeoResult};
use crate::preview::colormap::Colormap;
use crate::raster::band::Band;

/// Transparent columns between the image and the colour bar
pub const COLORBAR_GAP: u32 = 4;
/// Width of the colour bar in pixels
pub const COLORBAR_WIDTH: u32 = 16;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Files in `folder` whose name ends with `suffix`, sorted
pub fn list_images(folder: &Path, suffix: &str) -> GeoResult<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(suffix) {
            images.push(folder.join(entry.file_name()));
        }
    }
    images.sort();

    debug!("Found {} files ending in '{}' in {}", images.len(), suffix, folder.display());
    Ok(images)
}

/// Renders a band through a colormap, with a colour bar on the right
///
/// Samples equal to `nodata` (and NaN samples) are transparent. The rest
/// are stretched between their minimum and maximum. The bar runs from the
/// maximum at the top to the minimum at the bottom.
pub fn render_band(band: &Band, nodata: Option<f64>, colormap: Colormap, title: Option<&str>) -> RgbaImage {
    if let Some(title) = title {
        info!("Rendering {}", title);
    }

    let (rows, cols) = band.shape();
    let is_nodata = |v: f64| v.is_nan() || nodata.is_some_and(|n| v == n);
    let range = band.min_max(|v| !is_nodata(v));

    let bar_x = cols as u32 + COLORBAR_GAP;
    let mut image = RgbaImage::from_pixel(bar_x + COLORBAR_WIDTH, rows as u32, TRANSPARENT);

    let Some((min, max)) = range else {
        warn!("Band has no valid samples, preview is empty");
        return image;
    };
    debug!("Stretching {} colormap over [{}, {}]", colormap, min, max);

    let stretch = |v: f64| if max > min { (v - min) / (max - min) } else { 0.0 };
    for (i, value) in band.values().enumerate() {
        if is_nodata(value) {
            continue;
        }
        let [r, g, b] = colormap.color_at(stretch(value));
        image.put_pixel((i % cols) as u32, (i / cols) as u32, Rgba([r, g, b, 255]));
    }

    for y in 0..rows as u32 {
        let t = if rows > 1 { 1.0 - y as f64 / (rows - 1) as f64 } else { 1.0 };
        let [r, g, b] = colormap.color_at(t);
        for x in bar_x..bar_x + COLORBAR_WIDTH {
            image.put_pixel(x, y, Rgba([r, g, b, 255]));
        }
    }

    image
}

/// Output path for the preview of `source`: its file stem with `.png`
pub fn preview_path(output_dir: &Path, source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "preview".to_string());
    output_dir.join(format!("{}.png", stem))
}

/// Saves an image as PNG
pub fn save_png(image: &RgbaImage, path: &Path) -> GeoResult<()> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| GeoError::GenericError(format!("Failed to save preview {}: {}", path.display(), e)))?;
    info!("Preview saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::DataType;
    use tempfile::tempdir;

    fn band(values: &[f64], cols: usize) -> Band {
        Band::from_values(values.len() / cols, cols, DataType::F32, values).unwrap()
    }

    #[test]
    fn nodata_is_transparent_and_range_is_stretched() {
        let image = render_band(&band(&[0.0, 10.0, 20.0, 0.0], 2), Some(0.0), Colormap::Greys, None);

        assert_eq!(image.dimensions(), (2 + COLORBAR_GAP + COLORBAR_WIDTH, 2));
        assert_eq!(image.get_pixel(0, 0), &TRANSPARENT);
        assert_eq!(image.get_pixel(1, 1), &TRANSPARENT);
        assert_eq!(image.get_pixel(1, 0), &Rgba([255, 255, 255, 255]));
        assert_eq!(image.get_pixel(0, 1), &Rgba([0, 0, 0, 255]));
        assert_eq!(image.get_pixel(2, 0), &TRANSPARENT);
    }

    #[test]
    fn colour_bar_runs_from_max_to_min() {
        let image = render_band(&band(&[1.0, 2.0, 3.0], 1), None, Colormap::Greys, Some("ramp"));
        let bar_x = 1 + COLORBAR_GAP;
        assert_eq!(image.get_pixel(bar_x, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(image.get_pixel(bar_x, 2), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn all_nodata_band_renders_blank() {
        let image = render_band(&band(&[5.0, 5.0], 2), Some(5.0), Colormap::Viridis, None);
        assert!(image.pixels().all(|p| *p == TRANSPARENT));
    }

    #[test]
    fn images_are_listed_by_suffix_in_order() {
        let dir = tempdir().unwrap();
        for name in ["b.tiff", "a.tiff", "notes.txt", "c.tif"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("nested.tiff")).unwrap();

        let images = list_images(dir.path(), ".tiff").unwrap();
        assert_eq!(images, vec![dir.path().join("a.tiff"), dir.path().join("b.tiff")]);
    }

    #[test]
    fn png_is_written_next_to_its_name() {
        let dir = tempdir().unwrap();
        let path = preview_path(dir.path(), Path::new("/data/tile_x_0_y_0.tif"));
        assert_eq!(path, dir.path().join("tile_x_0_y_0.png"));

        save_png(&render_band(&band(&[1.0, 2.0], 2), None, Colormap::Set1, None), &path).unwrap();
        let reopened = image::open(&path).unwrap().to_rgba8();
        assert_eq!(reopened.dimensions(), (2 + COLORBAR_GAP + COLORBAR_WIDTH, 1));
    }
}
