//! Raster summary command

use std::path::PathBuf;

use clap::ArgMatches;

use crate::api::GeoClip;
use crate::commands::command_traits::Command;
use crate::commands::required_arg;
use crate::errors::GeoResult;
use crate::utils::logger::Logger;

/// Prints structure, georeferencing and value range of a raster
pub struct InfoCommand<'a> {
    input_file: PathBuf,
    all_tags: bool,
    logger: &'a Logger,
}

impl<'a> InfoCommand<'a> {
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> GeoResult<Self> {
        Ok(InfoCommand {
            input_file: PathBuf::from(required_arg(args, "input")?),
            all_tags: args.get_flag("tags"),
            logger,
        })
    }
}

impl Command for InfoCommand<'_> {
    fn execute(&self) -> GeoResult<()> {
        let report = GeoClip::new(self.logger.clone()).info(&self.input_file, self.all_tags)?;
        print!("{}", report);
        Ok(())
    }
}
