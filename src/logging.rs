//! Structured logging setup.
//!
//! File output goes to rolling daily logs under the platform data
//! directory; human-readable output goes to stderr. Filtering follows
//! `RUST_LOG`, defaulting to `info`.

use std::fs;
use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directory that receives rolling log files.
pub fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("host-bridge")
        .join("logs")
}

/// Initialize the structured logging system.
///
/// Sets up:
/// - File output: rolling log files in the platform data directory with
///   daily rotation, keeping the latest 5 files.
/// - Console output (stderr): compact human-readable format.
/// - Environment filter: defaults to `info`, configurable via `RUST_LOG`.
///
/// # Panics
///
/// Panics if the tracing subscriber cannot be set (e.g., called twice).
/// Use `try_init()` if you need fallible initialization.
pub fn init() {
    let log_dir = log_dir();

    // Ensure the log directory exists
    let _ = fs::create_dir_all(&log_dir);

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("bridge")
        .filename_suffix("log")
        .max_log_files(5)
        .build(&log_dir)
        .expect("Failed to create log file appender");

    // File layer: structured format for machine parsing
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // Console layer: human-readable for development
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true)
        .compact();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::info!(
        log_dir = %log_dir.display(),
        "Logger initialized"
    );
}

/// Try to initialize the logger, returning an error instead of panicking
/// if it has already been initialized.
pub fn try_init() -> Result<(), String> {
    let result = std::panic::catch_unwind(init);
    match result {
        Ok(()) => Ok(()),
        Err(_) => Err("Logger already initialized or initialization failed".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir_ends_with_crate_path() {
        let dir = log_dir();
        assert!(dir.ends_with("host-bridge/logs"));
    }
}
