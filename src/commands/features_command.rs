//! Feature property listing command

use std::path::PathBuf;

use clap::ArgMatches;
use geojson::JsonValue;

use crate::api::GeoClip;
use crate::commands::command_traits::Command;
use crate::commands::required_arg;
use crate::errors::GeoResult;
use crate::utils::logger::Logger;

/// Prints one property value per feature, one per line
pub struct FeaturesCommand<'a> {
    input_file: PathBuf,
    key: String,
    unique: bool,
    logger: &'a Logger,
}

impl<'a> FeaturesCommand<'a> {
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> GeoResult<Self> {
        Ok(FeaturesCommand {
            input_file: PathBuf::from(required_arg(args, "input")?),
            key: required_arg(args, "key")?,
            unique: args.get_flag("unique"),
            logger,
        })
    }
}

impl Command for FeaturesCommand<'_> {
    fn execute(&self) -> GeoResult<()> {
        let values = GeoClip::new(self.logger.clone()).features(&self.input_file, &self.key, self.unique)?;
        for value in &values {
            println!("{}", display_value(value));
        }
        Ok(())
    }
}

/// Strings print bare, everything else as JSON
fn display_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
