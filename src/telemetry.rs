//! Logging setup.
//!
//! The terminal belongs to the UI, so events go to `postform.log` in the data
//! directory. `POSTFORM_LOG` takes an `EnvFilter` directive and overrides the
//! configured level.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "POSTFORM_LOG";

/// Name of the log file inside the data directory.
pub const LOG_FILE: &str = "postform.log";

/// Errors that can occur while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("could not open log file: {0}")]
    Io(#[from] io::Error),

    #[error("could not install log subscriber: {0}")]
    Init(String),
}

/// Installs a file-backed `tracing` subscriber. Returns the log file path.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn init_logging(data_dir: &Path, default_level: &str) -> Result<PathBuf, TelemetryError> {
    std::fs::create_dir_all(data_dir)?;
    let path = data_dir.join(LOG_FILE);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(std::env::var(LOG_ENV).ok().as_deref(), default_level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))?;

    tracing::info!(log = %path.display(), "logging initialized");
    Ok(path)
}

/// Builds the filter from the environment directive, falling back to
/// `default_level` when it is unset or invalid.
fn filter(directive: Option<&str>, default_level: &str) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level))
}
