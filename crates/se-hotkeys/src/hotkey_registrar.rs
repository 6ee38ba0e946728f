//! Maps the binding table onto the ten global chords.
//!
//! The chord set is fixed, so OS registrations happen once at startup and
//! stay in place. Rebinding only swaps the action snapshot the
//! [`HotkeyHandler`](crate::HotkeyHandler) reads, which means there is never a
//! moment with no chords registered.

use crate::{
    AppError, AppResult, HotkeyActions,
    config::{BindingTable, Slot},
    hotkey_action::{chord_hotkey, chord_label},
};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use global_hotkey::GlobalHotKeyManager;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

/// Publishes chord actions derived from the current bindings.
pub struct HotkeyRegistrar {
    actions_tx: watch::Sender<Arc<HotkeyActions>>,
}

impl HotkeyRegistrar {
    /// Create a registrar with no actions and a receiver for the handler.
    pub fn new() -> (Self, watch::Receiver<Arc<HotkeyActions>>) {
        let (actions_tx, actions_rx) = watch::channel(Arc::new(HotkeyActions::default()));
        (Self { actions_tx }, actions_rx)
    }

    /// Replace every chord action with ones built from `table`.
    ///
    /// Paths are captured now; later table changes need another `apply`.
    #[instrument(skip_all)]
    pub fn apply(&self, table: &BindingTable) {
        let actions = HotkeyActions::from_table(table);
        let chords = actions.len();
        self.actions_tx.send_replace(Arc::new(actions));

        info!(
            chords = chords,
            bound = table.bound_count(),
            "Hotkey bindings applied"
        );
    }

    /// Register all ten chords with the OS.
    ///
    /// Must be called on a thread with a message pump (e.g. the main thread
    /// running a `tao` event loop) so that `WM_HOTKEY` messages are
    /// dispatched on Windows. The returned [`GlobalHotKeyManager`] must be
    /// kept alive on that thread for the chords to remain registered.
    ///
    /// Chords already owned by another process are skipped and returned as
    /// [`AppError::HotkeyConflict`]; the remaining chords still work.
    #[track_caller]
    #[instrument]
    pub fn register_chords() -> AppResult<(GlobalHotKeyManager, Vec<AppError>)> {
        let manager =
            GlobalHotKeyManager::new().map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to create manager: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let mut conflicts = Vec::new();

        for slot in Slot::all() {
            let chord = chord_label(slot);
            match manager.register(chord_hotkey(slot)) {
                Ok(()) => info!(hotkey = %chord, "Global hotkey registered"),
                Err(e) => {
                    warn!(hotkey = %chord, error = %e, "Global hotkey unavailable");
                    conflicts.push(AppError::HotkeyConflict {
                        chord,
                        reason: e.to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            }
        }

        Ok((manager, conflicts))
    }
}
