//! Applies [`AppCommand`]s to the [`Host`] and tracks the Attention flag.
//!
//! Kept apart from the tray plumbing in [`App`](crate::App) so the command
//! handling runs without an event loop.

use crate::{AppCommand, Host, TrayIconState, settings::SettingsMessage};

use se_hotkeys_core::{PlaybackMessage, Surface, SurfaceLauncher};

use tracing::{debug, error, info, instrument};

/// Routes commands to the host and remembers whether the last one failed.
pub struct Dispatcher<P: SurfaceLauncher, S: SurfaceLauncher> {
    host: Host<P, S>,
    /// Set by a failed operation, cleared by the next successful command.
    attention: bool,
    settings_available: bool,
}

impl<P, S> Dispatcher<P, S>
where
    P: SurfaceLauncher,
    P::Surface: Surface<Message = PlaybackMessage>,
    S: SurfaceLauncher,
    S::Surface: Surface<Message = SettingsMessage>,
{
    /// Start with `attention` already raised when startup hit a problem.
    pub fn new(host: Host<P, S>, attention: bool) -> Self {
        Self {
            host,
            attention,
            settings_available: true,
        }
    }

    /// Apply one command. Returns `false` when the loop should stop.
    #[instrument(skip(self))]
    pub fn handle_command(&mut self, cmd: AppCommand) -> bool {
        match cmd {
            AppCommand::PlaySound { slot, path } => {
                let result = self.host.play(slot, path);
                if let Err(e) = &result {
                    error!(slot = %slot, error = ?e, "Failed to start playback");
                }
                self.record_outcome(result.is_ok());
            }
            AppCommand::StopPlayback => {
                if !self.host.stop_playback() {
                    debug!("Nothing playing");
                }
                self.record_outcome(true);
            }
            AppCommand::PlaybackEvent(event) => {
                self.host.handle_playback_event(event);
            }
            AppCommand::SettingsEvent(event) => {
                if self.host.handle_settings_event(event) {
                    debug!(phase = ?self.host.settings_phase(), "Settings surface changed");
                }
            }
            AppCommand::UpdateBindings { surface_id, table } => {
                info!(surface_id = %surface_id, "Bindings submitted");
                let result = self.host.update_bindings(table);
                info!(
                    bound = self.host.bindings().bound_count(),
                    "Bindings in effect"
                );
                self.record_outcome(result.is_ok());
            }
            AppCommand::SettingsServerDown => self.settings_unavailable(),
            AppCommand::Shutdown => return false,
        }

        true
    }

    /// Open the settings page, or flag Attention when it cannot be served.
    pub fn open_settings(&mut self) {
        if !self.settings_available {
            error!("Settings server is not running, cannot open settings");
            self.record_outcome(false);
            return;
        }

        let result = self.host.open_settings();
        if let Err(e) = &result {
            error!(error = ?e, "Failed to open settings");
        }
        self.record_outcome(result.is_ok());
    }

    /// The settings server is gone. Later opens fail instead of launching a
    /// page nothing will answer.
    pub fn settings_unavailable(&mut self) {
        self.settings_available = false;
        self.record_outcome(false);
    }

    /// Icon state for the current flag and playback phase.
    pub fn tray_state(&self) -> TrayIconState {
        TrayIconState::resolve(self.attention, self.host.playback_phase())
    }

    /// Close every tracked surface.
    pub fn shutdown(&mut self) {
        self.host.shutdown();
    }

    fn record_outcome(&mut self, succeeded: bool) {
        self.attention = !succeeded;
    }
}
