use clap::{Arg, ArgAction, ArgMatches, Command as ClapCommand};
use log::{error, LevelFilter};
use std::path::Path;
use std::process;

use geoclip::commands::{CommandFactory, GeoclipCommandFactory};
use geoclip::compression::CompressionFactory;
use geoclip::preview::Colormap;
use geoclip::utils::logger::Logger;

fn input_arg(help: &'static str) -> Arg {
    Arg::new("input").help(help).required(true).index(1)
}

fn cli() -> ClapCommand {
    ClapCommand::new("geoclip")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Split georeferenced rasters into overlapping GeoTIFF tiles")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("More log output (-v debug, -vv trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Hide progress bars")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Write the log and run summaries to this file")
                .value_name("FILE")
                .global(true),
        )
        .subcommand(
            ClapCommand::new("clip")
                .about("Split a raster band into GeoTIFF tiles")
                .arg(input_arg("Input GeoTIFF"))
                .arg(
                    Arg::new("height")
                        .long("height")
                        .help("Tile height in pixels")
                        .value_name("PIXELS"),
                )
                .arg(
                    Arg::new("width")
                        .long("width")
                        .help("Tile width in pixels")
                        .value_name("PIXELS"),
                )
                .arg(
                    Arg::new("buffer")
                        .short('b')
                        .long("buffer")
                        .help("Pixels shared by neighbouring tiles")
                        .value_name("PIXELS"),
                )
                .arg(
                    Arg::new("prefix")
                        .short('p')
                        .long("prefix")
                        .help("Prefix of the tile file names [default: clipped_band_]")
                        .value_name("PREFIX"),
                )
                .arg(
                    Arg::new("output-dir")
                        .short('o')
                        .long("output-dir")
                        .help("Directory the tiles are written to")
                        .value_name("DIR"),
                )
                .arg(
                    Arg::new("skip-empty")
                        .long("skip-empty")
                        .help("Stop a row at the first tile whose mean is zero")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("compression")
                        .long("compression")
                        .help("Tile compression")
                        .value_name("NAME")
                        .value_parser(CompressionFactory::available_names()),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("TOML file with [clip] defaults")
                        .value_name("FILE"),
                ),
        )
        .subcommand(
            ClapCommand::new("info")
                .about("Describe a raster")
                .arg(input_arg("Input GeoTIFF"))
                .arg(
                    Arg::new("tags")
                        .long("tags")
                        .help("List every TIFF tag")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            ClapCommand::new("features")
                .about("List a property of every feature in a GeoJSON file")
                .arg(input_arg("Input GeoJSON"))
                .arg(
                    Arg::new("key")
                        .short('k')
                        .long("key")
                        .help("Property name")
                        .value_name("KEY")
                        .required(true),
                )
                .arg(
                    Arg::new("unique")
                        .short('u')
                        .long("unique")
                        .help("Drop repeated values, keeping first-seen order")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            ClapCommand::new("coordinate")
                .about("Print the x or y coordinate of every point feature")
                .arg(input_arg("Input GeoJSON"))
                .arg(
                    Arg::new("axis")
                        .short('a')
                        .long("axis")
                        .help("\"x\" for longitude or \"y\" for latitude")
                        .value_name("AXIS")
                        .required(true),
                ),
        )
        .subcommand(
            ClapCommand::new("preview")
                .about("Render rasters of a folder to colour-mapped PNGs")
                .arg(Arg::new("folder").help("Folder to scan").required(true).index(1))
                .arg(
                    Arg::new("suffix")
                        .short('s')
                        .long("suffix")
                        .help("File name ending to match")
                        .value_name("SUFFIX")
                        .default_value(".tif"),
                )
                .arg(
                    Arg::new("colormap")
                        .long("colormap")
                        .help("Colour ramp")
                        .value_name("NAME")
                        .value_parser(Colormap::names().to_vec())
                        .default_value("set1"),
                )
                .arg(
                    Arg::new("nodata")
                        .long("nodata")
                        .help("Value drawn transparent (default: the raster's no-data tag, else 0)")
                        .value_name("VALUE"),
                )
                .arg(
                    Arg::new("output-dir")
                        .short('o')
                        .long("output-dir")
                        .help("Directory the PNGs are written to (default: the scanned folder)")
                        .value_name("DIR"),
                ),
        )
}

fn log_level(matches: &ArgMatches) -> LevelFilter {
    match matches.get_count("verbose") {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Sets up the `log` backend and returns the run-summary logger
fn init_logging(matches: &ArgMatches) -> geoclip::GeoResult<Logger> {
    let level = log_level(matches);

    match matches.get_one::<String>("log-file") {
        Some(log_file) => Logger::init_global_logger(Path::new(log_file), level),
        None => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
                .init();
            Ok(Logger::disabled())
        }
    }
}

fn main() {
    let matches = cli().get_matches();

    let logger = match init_logging(&matches) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error initializing logger: {}", e);
            process::exit(1);
        }
    };

    let factory = GeoclipCommandFactory::new();

    let command_result = factory.create_command(&matches, &logger);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Failed to create command: {}", e);
            process::exit(1);
        }
    };
}
