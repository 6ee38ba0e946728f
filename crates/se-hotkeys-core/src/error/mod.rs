use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Surface and playback errors with source location tracking.
#[derive(Error, Debug)]
pub enum SurfaceError {
    /// No audio output device found.
    #[error("No audio output device found {location}")]
    NoOutputDevice {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio device operation failed.
    #[error("Audio device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Sound file could not be opened or decoded.
    #[error("Failed to decode {path:?}: {reason} {location}")]
    DecodeFailed {
        /// Path of the sound file.
        path: PathBuf,
        /// Description of the decode failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio resampling failed.
    #[error("Resampling error: {reason} {location}")]
    ResamplingError {
        /// Description of the resampling error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A surface instance could not be created.
    #[error("Failed to launch surface: {reason} {location}")]
    LaunchFailed {
        /// Description of the launch failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A control message could not be delivered to a surface.
    #[error("Failed to send to surface: {reason} {location}")]
    SendFailed {
        /// Description of the delivery failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`SurfaceError`].
pub type Result<T> = std::result::Result<T, SurfaceError>;
