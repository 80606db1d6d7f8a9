use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{SplitError, SplitResult};

use super::formatter::BracketedFormatter;

/// Install the global subscriber: compact bracketed stdout logging plus,
/// when `log_dir` is given, a timestamped log file with source locations.
///
/// `RUST_LOG` overrides `default_level`.
///
/// # Returns
/// * `Ok(Some(PathBuf))` with the log file path when file logging is on
pub fn setup_logging(log_dir: Option<&Path>, default_level: &str) -> SplitResult<Option<PathBuf>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (file_layer, log_path) = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|e| SplitError::io(dir, e))?;

            let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
            let log_path = dir.join(format!("dataset_split_{}.log", timestamp));
            let file = fs::OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&log_path)
                .map_err(|e| SplitError::io(&log_path, e))?;

            let layer = fmt::layer()
                .event_format(BracketedFormatter::verbose())
                .with_writer(Mutex::new(file))
                .with_ansi(false);
            (Some(layer), Some(log_path))
        }
        None => (None, None),
    };

    let stdout_layer = fmt::layer()
        .event_format(BracketedFormatter::compact())
        .with_writer(std::io::stdout);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    if let Some(path) = &log_path {
        info!("Log file created at: {:?}", path);
    }

    Ok(log_path)
}
