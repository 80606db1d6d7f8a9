//! Logging for the dataset splitter
//!
//! - Bracketed log lines
//! - stdout, plus an optional timestamped log file

mod formatter;
mod setup;

pub use formatter::BracketedFormatter;
pub use setup::setup_logging;
