use crate::config::{BindingTable, Slot};

use std::path::PathBuf;

use se_hotkeys_core::{SurfaceEvent, SurfaceId};

/// Commands sent to the main application loop.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// A sound chord was pressed.
    PlaySound {
        /// Slot of the pressed chord.
        slot: Slot,
        /// Path captured when bindings were last applied.
        path: Option<PathBuf>,
    },
    /// The stop chord was pressed.
    StopPlayback,
    /// Lifecycle event from a playback surface.
    PlaybackEvent(SurfaceEvent),
    /// Lifecycle event from a settings surface.
    SettingsEvent(SurfaceEvent),
    /// The settings surface submitted a full replacement table.
    UpdateBindings {
        /// Settings surface that submitted the table.
        surface_id: SurfaceId,
        /// The new bindings.
        table: BindingTable,
    },
    /// The settings server stopped serving.
    SettingsServerDown,
    /// Request application shutdown.
    Shutdown,
}
