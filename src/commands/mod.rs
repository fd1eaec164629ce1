//! CLI command implementations
//!
//! One command per subcommand of the `geoclip` binary, each a thin layer
//! over [`crate::api::GeoClip`].

pub mod command_traits;
pub mod clip_command;
pub mod info_command;
pub mod features_command;
pub mod coordinate_command;
pub mod preview_command;

pub use command_traits::{Command, CommandFactory};
pub use clip_command::ClipCommand;
pub use info_command::InfoCommand;
pub use features_command::FeaturesCommand;
pub use coordinate_command::CoordinateCommand;
pub use preview_command::PreviewCommand;

use clap::ArgMatches;

use crate::errors::{GeoError, GeoResult};
use crate::utils::logger::Logger;

/// Picks the command for the subcommand on the command line
#[derive(Default)]
pub struct GeoclipCommandFactory;

impl GeoclipCommandFactory {
    pub fn new() -> Self {
        GeoclipCommandFactory
    }
}

impl<'a> CommandFactory<'a> for GeoclipCommandFactory {
    fn create_command(&self, args: &ArgMatches, logger: &'a Logger) -> GeoResult<Box<dyn Command + 'a>> {
        match args.subcommand() {
            Some(("clip", sub)) => Ok(Box::new(ClipCommand::new(sub, logger)?)),
            Some(("info", sub)) => Ok(Box::new(InfoCommand::new(sub, logger)?)),
            Some(("features", sub)) => Ok(Box::new(FeaturesCommand::new(sub, logger)?)),
            Some(("coordinate", sub)) => Ok(Box::new(CoordinateCommand::new(sub, logger)?)),
            Some(("preview", sub)) => Ok(Box::new(PreviewCommand::new(sub, logger)?)),
            Some((other, _)) => Err(GeoError::Config(format!("Unknown command '{}'", other))),
            None => Err(GeoError::Config("No command given, see --help".to_string())),
        }
    }
}

/// Required string argument
pub(crate) fn required_arg(args: &ArgMatches, name: &str) -> GeoResult<String> {
    args.get_one::<String>(name)
        .cloned()
        .ok_or_else(|| GeoError::Config(format!("Missing argument '{}'", name)))
}

/// Optional argument parsed with `FromStr`
pub(crate) fn parsed_arg<T>(args: &ArgMatches, name: &str) -> GeoResult<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    args.get_one::<String>(name)
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|e| GeoError::Config(format!("Invalid value '{}' for '{}': {}", value, name, e)))
        })
        .transpose()
}

/// Whether a global `--quiet` flag was given
pub(crate) fn is_quiet(args: &ArgMatches) -> bool {
    args.try_get_one::<bool>("quiet").ok().flatten().copied().unwrap_or(false)
}
