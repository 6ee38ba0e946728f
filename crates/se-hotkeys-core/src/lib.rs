//! SE Hotkeys Core Library
//!
//! Lifecycle management for transient surfaces plus the playback surface that
//! turns a sound file into audio on the default output device.
//!
//! # Example
//!
//! ```no_run
//! use se_hotkeys_core::{
//!     CoreResult, PlaybackLauncher, PlaybackMessage, RequestPolicy, SurfaceController,
//! };
//!
//! use std::{path::PathBuf, sync::Arc};
//!
//! fn main() -> CoreResult<()> {
//!     let launcher = PlaybackLauncher::new(1.0, Arc::new(|event| println!("{event:?}")));
//!     let mut playback = SurfaceController::new(launcher, RequestPolicy::Replace);
//!
//!     let path = PathBuf::from("sounds/applause.mp3");
//!     playback.request(PlaybackMessage::Play(Some(path)))?;
//!     Ok(())
//! }
//! ```

mod error;
mod playback;
mod surface;

pub use {
    error::Result as CoreResult,
    error::SurfaceError,
    playback::{PlaybackLauncher, PlaybackMessage, PlaybackSurface},
    surface::{
        EventSink, RequestPolicy, Surface, SurfaceController, SurfaceEvent, SurfaceId,
        SurfaceLauncher, SurfacePhase,
    },
};
