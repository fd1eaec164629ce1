//! Quick-look rendering of raster bands
//!
//! Lists rasters in a folder and turns a band into a colour-mapped PNG with
//! a colour bar, no-data pixels left transparent.

mod colormap;
mod render;

pub use self::colormap::Colormap;
pub use self::render::{list_images, preview_path, render_band, save_png};
