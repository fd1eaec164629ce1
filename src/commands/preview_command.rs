//! Quick-look PNG command

use std::path::PathBuf;

use clap::ArgMatches;
use log::info;

use crate::api::GeoClip;
use crate::commands::command_traits::Command;
use crate::commands::{parsed_arg, required_arg};
use crate::errors::GeoResult;
use crate::preview::Colormap;
use crate::utils::logger::Logger;

/// Renders every matching raster of a folder to PNG
pub struct PreviewCommand<'a> {
    folder: PathBuf,
    suffix: String,
    colormap: Colormap,
    nodata: Option<f64>,
    output_dir: PathBuf,
    logger: &'a Logger,
}

impl<'a> PreviewCommand<'a> {
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> GeoResult<Self> {
        let folder = PathBuf::from(required_arg(args, "folder")?);
        let output_dir = args
            .get_one::<String>("output-dir")
            .map(PathBuf::from)
            .unwrap_or_else(|| folder.clone());

        Ok(PreviewCommand {
            suffix: required_arg(args, "suffix")?,
            colormap: required_arg(args, "colormap")?.parse()?,
            nodata: parsed_arg(args, "nodata")?,
            folder,
            output_dir,
            logger,
        })
    }
}

impl Command for PreviewCommand<'_> {
    fn execute(&self) -> GeoResult<()> {
        let written = GeoClip::new(self.logger.clone()).preview(
            &self.folder,
            &self.suffix,
            self.colormap,
            self.nodata,
            &self.output_dir,
        )?;
        for path in &written {
            info!("{}", path.display());
        }
        Ok(())
    }
}
