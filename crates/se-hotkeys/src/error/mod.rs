use se_hotkeys_core::SurfaceError;

use std::{panic::Location, result::Result as StdResult};

use error_location::ErrorLocation;
use thiserror::Error;

/// Application-level errors for the se-hotkeys binary.
///
/// All variants include `ErrorLocation` for call-site tracking.
#[derive(Error, Debug)]
pub enum AppError {
    /// Surface subsystem error from se-hotkeys-core.
    #[error("Surface error: {source} {location}")]
    Surface {
        /// The underlying surface error.
        #[source]
        source: SurfaceError,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Persisted bindings exist but cannot be read or parsed.
    #[error("Failed to load bindings: {reason} {location}")]
    ConfigLoad {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Persisting bindings failed; memory and disk now disagree.
    #[error("Failed to save bindings: {reason} {location}")]
    ConfigWrite {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Configuration loading or saving error.
    #[error("Configuration error: {reason} {location}")]
    ConfigError {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Failed to set up global hotkey handling.
    #[error("Hotkey registration failed: {reason} {location}")]
    HotkeyRegistrationFailed {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// A chord is already owned by another process.
    #[error("Hotkey {chord} unavailable: {reason} {location}")]
    HotkeyConflict {
        /// The chord that could not be registered.
        chord: String,
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Failed to send message through async channel.
    #[error("Channel send failed: {message} {location}")]
    ChannelSendFailed {
        /// Human-readable error message.
        message: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Settings server could not start or serve.
    #[error("Settings server error: {reason} {location}")]
    ServerError {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Tray icon or menu operation failed.
    #[error("Tray error: {reason} {location}")]
    TrayError {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// IO error from filesystem operations.
    #[error("IO error: {source} {location}")]
    IoError {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Location where this error was created.
        location: ErrorLocation,
    },
}

// Manual From<SurfaceError> with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<SurfaceError> for AppError {
    #[track_caller]
    fn from(source: SurfaceError) -> Self {
        AppError::Surface {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for AppError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        AppError::IoError {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Convenience type alias for Results using `AppError`.
pub type Result<T> = StdResult<T, AppError>;
