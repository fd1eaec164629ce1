//! Point coordinate extraction command

use std::path::PathBuf;

use clap::ArgMatches;

use crate::api::GeoClip;
use crate::commands::command_traits::Command;
use crate::commands::required_arg;
use crate::errors::GeoResult;
use crate::utils::logger::Logger;
use crate::vector::Axis;

/// Prints `index<TAB>coordinate` for every point feature
pub struct CoordinateCommand<'a> {
    input_file: PathBuf,
    axis: Axis,
    logger: &'a Logger,
}

impl<'a> CoordinateCommand<'a> {
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> GeoResult<Self> {
        let axis = required_arg(args, "axis")?.parse::<Axis>()?;
        Ok(CoordinateCommand {
            input_file: PathBuf::from(required_arg(args, "input")?),
            axis,
            logger,
        })
    }
}

impl Command for CoordinateCommand<'_> {
    fn execute(&self) -> GeoResult<()> {
        let coordinates = GeoClip::new(self.logger.clone()).coordinates(&self.input_file, self.axis)?;
        for (index, value) in coordinates {
            println!("{}\t{}", index, value);
        }
        Ok(())
    }
}
