//! Utility modules for common functionality
//!
//! Tag naming and inline-value rules, header and IFD parsing helpers,
//! low-level write helpers, logging and progress reporting.

pub mod logger;
pub(crate) mod progress;
pub(crate) mod write_utils;
pub(crate) mod ifd_utils;
pub(crate) mod format_utils;
pub(crate) mod tag_utils;
