//! File-backed logger
//!
//! Works as a `log` backend when a log file is requested on the command
//! line, echoing every record to stderr as well. Commands also write run
//! summaries through [`Logger::log`] directly.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use log::{LevelFilter, Log, Metadata, Record};

use crate::errors::{GeoError, GeoResult};
use crate::raster::SpatialReference;

/// Handles share one file, so a clone installed as the `log` backend and
/// the copy kept for run summaries append to the same log.
#[derive(Clone)]
pub struct Logger {
    file: Arc<Mutex<Option<File>>>,
    level: LevelFilter,
}

impl Logger {
    /// Creates (or truncates) the log file
    pub fn new(log_file: &Path, level: LevelFilter) -> GeoResult<Self> {
        let file = File::create(log_file)?;
        Ok(Logger {
            file: Arc::new(Mutex::new(Some(file))),
            level,
        })
    }

    /// A logger with no file behind it; messages are dropped
    pub fn disabled() -> Self {
        Logger {
            file: Arc::new(Mutex::new(None)),
            level: LevelFilter::Off,
        }
    }

    /// Appends one line to the log file
    pub fn log(&self, message: &str) -> GeoResult<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| GeoError::GenericError("Log file lock poisoned".to_string()))?;
        if let Some(file) = guard.as_mut() {
            writeln!(file, "{}", message)?;
            file.flush()?;
        }
        Ok(())
    }

    /// Writes the GeoKey directory of a raster, one key per line
    pub fn log_spatial_reference(&self, srs: &SpatialReference) -> GeoResult<()> {
        self.log(&format!("Spatial reference: {}", srs.describe()))?;
        for key in srs.geo_keys() {
            self.log(&format!(
                "  Key ID: {} ({}), Location: {}, Count: {}, Value: {}",
                key.key_id,
                key.name(),
                key.tiff_tag_location,
                key.count,
                key.value_offset
            ))?;
        }
        Ok(())
    }

    /// Installs a file logger as the global `log` backend
    pub fn init_global_logger(log_file: &Path, level: LevelFilter) -> GeoResult<Logger> {
        let logger = Logger::new(log_file, level)?;
        logger.install()?;
        Ok(logger)
    }

    /// Installs a handle on this logger's file as the global `log` backend
    pub fn install(&self) -> GeoResult<()> {
        log::set_boxed_logger(Box::new(self.clone()))
            .map_err(|e| GeoError::GenericError(format!("Logger already initialised: {}", e)))?;
        log::set_max_level(self.level);
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("[{}] {}: {}", record.level(), record.target(), record.args());
            let _ = Logger::log(self, &message);
            eprintln!("{}", message);
        }
    }

    fn flush(&self) {}
}
