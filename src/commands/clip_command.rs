//! Raster tiling command

use std::path::PathBuf;

use clap::ArgMatches;
use log::info;

use crate::api::GeoClip;
use crate::commands::command_traits::Command;
use crate::commands::{is_quiet, parsed_arg, required_arg};
use crate::config::ClipConfig;
use crate::errors::GeoResult;
use crate::utils::logger::Logger;

/// Splits a raster into GeoTIFF tiles on disk
pub struct ClipCommand<'a> {
    input_file: PathBuf,
    config: ClipConfig,
    quiet: bool,
    logger: &'a Logger,
}

impl<'a> ClipCommand<'a> {
    /// Merges `--config` file values with the flags; flags win
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> GeoResult<Self> {
        let input_file = PathBuf::from(required_arg(args, "input")?);

        let file_config = match args.get_one::<String>("config") {
            Some(path) => ClipConfig::load(&PathBuf::from(path))?,
            None => ClipConfig::default(),
        };

        let flags = ClipConfig {
            height: parsed_arg(args, "height")?,
            width: parsed_arg(args, "width")?,
            buffer: parsed_arg(args, "buffer")?,
            prefix: args.get_one::<String>("prefix").cloned(),
            output_dir: args.get_one::<String>("output-dir").map(PathBuf::from),
            skip_empty: args.get_flag("skip-empty").then_some(true),
            compression: args.get_one::<String>("compression").cloned(),
        };

        Ok(ClipCommand {
            input_file,
            config: file_config.merge(flags),
            quiet: is_quiet(args),
            logger,
        })
    }
}

impl Command for ClipCommand<'_> {
    fn execute(&self) -> GeoResult<()> {
        let options = self.config.to_options()?;
        let api = GeoClip::new(self.logger.clone()).with_progress(!self.quiet);

        let paths = api.clip(&self.input_file, &options)?;
        info!("{} tiles written to {}", paths.len(), options.output_dir.display());
        Ok(())
    }
}
