//! Log setup. The TUI owns the terminal, so events go to a file.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{LoggingSettings, default_log_path};

/// `ENCORE_LOG` overrides the configured level, e.g. `ENCORE_LOG=encore=debug`.
pub const LOG_ENV: &str = "ENCORE_LOG";

fn log_path(settings: &LoggingSettings) -> Option<PathBuf> {
    settings.file.clone().or_else(default_log_path)
}

/// Install the global subscriber. Returns the file being written to.
pub fn init(settings: &LoggingSettings) -> io::Result<PathBuf> {
    let path = log_path(settings)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no directory for the log file"))?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&settings.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| io::Error::other(e.to_string()))?;

    Ok(path)
}
