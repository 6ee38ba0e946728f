use crate::{
    AppError, AppResult,
    config::{BindingTable, project_dirs, write_atomic},
};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument};

const BINDINGS_FILE_NAME: &str = "se_hotkeys_bindings.json";

/// Persists the [`BindingTable`] as JSON at a fixed per-user path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store backed by an explicit file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the per-user data directory, creating the directory if needed.
    #[track_caller]
    pub fn user_default() -> AppResult<Self> {
        let proj_dirs = project_dirs()?;
        let data_dir = proj_dirs.data_dir();

        if !data_dir.exists() {
            fs::create_dir_all(data_dir)?;
            debug!(data_dir = ?data_dir, "Created data directory");
        }

        Ok(Self::new(data_dir.join(BINDINGS_FILE_NAME)))
    }

    /// Location of the bindings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the bindings, writing an all-unbound table on first run.
    ///
    /// A file that exists but cannot be parsed is an error; it is never
    /// silently replaced.
    #[track_caller]
    #[instrument(skip(self), fields(path = ?self.path))]
    pub fn load(&self) -> AppResult<BindingTable> {
        if !self.path.exists() {
            info!("No bindings found, creating default");
            let table = BindingTable::default();
            self.save(&table)?;
            return Ok(table);
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| AppError::ConfigLoad {
            reason: format!("Failed to read bindings: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let table: BindingTable =
            serde_json::from_str(&contents).map_err(|e| AppError::ConfigLoad {
                reason: format!("Failed to parse bindings: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(bound = table.bound_count(), "Bindings loaded");

        Ok(table)
    }

    /// Overwrite the bindings file with `table`.
    #[track_caller]
    #[instrument(skip(self, table), fields(path = ?self.path))]
    pub fn save(&self, table: &BindingTable) -> AppResult<()> {
        let contents = serde_json::to_string_pretty(table).map_err(|e| AppError::ConfigWrite {
            reason: format!("Failed to serialize bindings: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        write_atomic(&self.path, contents.as_bytes()).map_err(|e| AppError::ConfigWrite {
            reason: format!("Failed to write bindings: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(bound = table.bound_count(), "Bindings saved (atomic write)");

        Ok(())
    }
}
