mod binding_table;
#[allow(clippy::module_inception)]
mod config;
mod config_store;
mod playback_config;
mod server_config;

pub(crate) use {
    binding_table::{BindingTable, SLOT_COUNT, Slot},
    config::Config,
    config_store::ConfigStore,
    playback_config::PlaybackConfig,
    server_config::ServerConfig,
};

use crate::{AppError, AppResult};

use std::{
    fs,
    io::{self, Write},
    panic::Location,
    path::Path,
};

use directories::ProjectDirs;
use error_location::ErrorLocation;

pub(crate) const DEFAULT_PORT: u16 = 7979;
pub(crate) const DEFAULT_VOLUME: f32 = 1.0;

pub(crate) fn default_port() -> u16 {
    DEFAULT_PORT
}

pub(crate) fn default_volume() -> f32 {
    DEFAULT_VOLUME
}

/// Per-user directories for config, data and logs.
#[track_caller]
pub(crate) fn project_dirs() -> AppResult<ProjectDirs> {
    ProjectDirs::from("com", "se-hotkeys", "SE Hotkeys").ok_or_else(|| AppError::ConfigError {
        reason: "Failed to get project directories".to_string(),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Write `contents` to a temporary sibling and rename it over `path`.
///
/// A crash mid-write leaves either the old file or the new one, never a
/// truncated mix.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = Path::new(&temp_name);

    let mut temp_file = fs::File::create(temp_path)?;
    temp_file.write_all(contents)?;
    temp_file.sync_all()?;
    drop(temp_file);

    fs::rename(temp_path, path)
}
