use crate::config::default_volume;

use serde::{Deserialize, Serialize};

/// Sound playback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Output volume from 0.0 (silent) to 1.0 (unchanged).
    #[serde(default = "default_volume")]
    pub volume: f32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
        }
    }
}
