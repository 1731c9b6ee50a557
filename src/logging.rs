//! Logging infrastructure for sheetsql
//!
//! Logs are written to stderr and to a daily rolling file in the app data
//! directory. Stdout is left alone so `sheetsql convert` can pipe the script.
//!
//! ## Usage
//!
//! ```no_run
//! use sheetsql::logging;
//!
//! // Initialize once at app startup
//! logging::init().expect("Failed to initialize logging");
//!
//! tracing::info!("App started");
//! ```

use anyhow::{Context as _, Result};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Gets the log directory path based on platform conventions
///
/// Returns:
/// - Windows: `%APPDATA%/sheetsql/logs`
/// - macOS: `~/Library/Application Support/sheetsql/logs`
/// - Linux: `~/.local/share/sheetsql/logs`
pub fn get_log_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to determine data directory")?;

    let log_dir = base_dir.join("sheetsql").join("logs");

    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    }

    Ok(log_dir)
}

fn env_filter() -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to create env filter")
}

/// Initializes logging with stderr and file output.
///
/// The file `sheetsql.<date>.log` rotates daily, keeping 10 old files.
///
/// # Errors
///
/// Returns error if the log directory cannot be created or the file
/// appender fails. Callers may fall back to [`init_stderr_only`].
pub fn init() -> Result<()> {
    let log_dir = get_log_dir()?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(10)
        .filename_prefix("sheetsql")
        .filename_suffix("log")
        .build(&log_dir)
        .context("Failed to create log file appender")?;

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false)
        .with_writer(file_appender);

    tracing_subscriber::registry()
        .with(env_filter()?)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!("Logging initialized, log directory: {}", log_dir.display());

    Ok(())
}

/// Stderr-only logging, used when the data directory is unavailable.
///
/// # Errors
///
/// Returns error if a global subscriber is already installed.
pub fn init_stderr_only() -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter()?)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .context("Failed to install tracing subscriber")
}

/// Gets the path to the current log file
pub fn get_current_log_path() -> Result<PathBuf> {
    let log_dir = get_log_dir()?;
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    Ok(log_dir.join(format!("sheetsql.{today}.log")))
}
