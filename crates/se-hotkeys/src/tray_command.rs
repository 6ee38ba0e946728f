use crate::TrayIconState;

/// Requests from the app loop to the event-loop thread that owns the tray.
///
/// `SetState` switches the icon between Idle, Playing and Attention after the
/// app loop resolves a new [`TrayIconState`]. `Shutdown` is sent last on quit,
/// once every surface has been closed and the settings server has stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayCommand {
    /// Show the icon and tooltip for this state.
    SetState(TrayIconState),
    /// Leave the event loop, which unregisters the chords and drops the icon.
    Shutdown,
}
