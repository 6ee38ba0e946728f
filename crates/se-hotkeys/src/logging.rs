//! Tracing setup: human-readable output on stderr and a JSON log file.
//!
//! A tray application usually has no console attached, so the file under
//! `<data dir>/logs` is where failures end up.

use crate::{AppError, AppResult, config::project_dirs};

use std::{fs, io, panic::Location, path::PathBuf};

use error_location::ErrorLocation;
use tracing::{info, warn};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "se_hotkeys=debug,se_hotkeys_core=debug";

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the default filter. The returned guard flushes the
/// file writer and must be held until the process exits. Without a usable
/// log directory only stderr output is kept.
pub fn init() -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (file_layer, guard, log_dir) = match file_appender() {
        Ok((appender, log_dir)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().json().with_writer(writer)),
                Some(guard),
                Ok(log_dir),
            )
        }
        Err(e) => (None, None, Err(e)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .init();

    match log_dir {
        Ok(log_dir) => info!(log_dir = ?log_dir, "Logging initialized"),
        Err(e) => warn!(error = ?e, "File logging unavailable, using stderr only"),
    }

    guard
}

#[track_caller]
fn file_appender() -> AppResult<(RollingFileAppender, PathBuf)> {
    let log_dir = project_dirs()?.data_dir().join("logs");
    fs::create_dir_all(&log_dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("se-hotkeys")
        .filename_suffix("log")
        .build(&log_dir)
        .map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create log file appender: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    Ok((appender, log_dir))
}
