//! Command pattern interfaces

use crate::errors::GeoResult;
use crate::utils::logger::Logger;

/// An executable CLI operation
pub trait Command {
    fn execute(&self) -> GeoResult<()>;
}

/// Creates the command selected by the parsed arguments
pub trait CommandFactory<'a> {
    /// `args` are the top-level matches; the factory dispatches on the
    /// subcommand and hands its matches to the command.
    fn create_command(&self, args: &clap::ArgMatches, logger: &'a Logger) -> GeoResult<Box<dyn Command + 'a>>;
}
