//! Ties the bindings, the hotkey registrar and both surface controllers
//! together.
//!
//! The host is owned by the [`App`](crate::App) loop and processes one
//! command at a time, so a binding update is saved, echoed and applied
//! before the next hotkey press is looked at.

use crate::{
    AppResult, HotkeyRegistrar,
    config::{BindingTable, ConfigStore, Slot},
    settings::SettingsMessage,
};

use se_hotkeys_core::{
    PlaybackMessage, RequestPolicy, Surface, SurfaceController, SurfaceEvent, SurfaceId,
    SurfaceLauncher, SurfacePhase,
};

use std::{path::PathBuf, sync::Arc};

use tracing::{error, info, instrument, warn};

/// Owner of the live bindings and the playback and settings surfaces.
pub struct Host<P: SurfaceLauncher, S: SurfaceLauncher> {
    store: ConfigStore,
    registrar: HotkeyRegistrar,
    bindings: Arc<BindingTable>,
    playback: SurfaceController<P>,
    settings: SurfaceController<S>,
}

impl<P, S> Host<P, S>
where
    P: SurfaceLauncher,
    P::Surface: Surface<Message = PlaybackMessage>,
    S: SurfaceLauncher,
    S::Surface: Surface<Message = SettingsMessage>,
{
    /// Load the persisted bindings and publish their chord actions.
    ///
    /// Fails only when the bindings file exists but cannot be read.
    #[track_caller]
    #[instrument(skip_all, fields(path = ?store.path()))]
    pub fn start(
        store: ConfigStore,
        registrar: HotkeyRegistrar,
        playback_launcher: P,
        settings_launcher: S,
    ) -> AppResult<Self> {
        let bindings = store.load()?;
        registrar.apply(&bindings);

        info!(bound = bindings.bound_count(), "Host started");

        Ok(Self {
            store,
            registrar,
            bindings: Arc::new(bindings),
            playback: SurfaceController::new(playback_launcher, RequestPolicy::Replace),
            settings: SurfaceController::new(settings_launcher, RequestPolicy::ReuseLive),
        })
    }

    /// The current bindings.
    pub fn bindings(&self) -> Arc<BindingTable> {
        Arc::clone(&self.bindings)
    }

    /// Start a playback surface for `slot`, detaching any earlier one.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn play(&mut self, slot: Slot, path: Option<PathBuf>) -> AppResult<SurfaceId> {
        Ok(self.playback.request(PlaybackMessage::Play(path))?)
    }

    /// Stop the tracked playback. Returns `false` if nothing was playing.
    pub fn stop_playback(&mut self) -> bool {
        self.playback.teardown()
    }

    /// Open the settings surface, or refresh the one already open.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn open_settings(&mut self) -> AppResult<SurfaceId> {
        let message = SettingsMessage::CurrentBindings((*self.bindings).clone());
        Ok(self.settings.request(message)?)
    }

    /// Replace the bindings with `table`.
    ///
    /// The new table is kept, echoed to the settings surface and applied to
    /// the chords even when persisting it fails; the save error is returned
    /// afterwards so the caller can flag it.
    #[instrument(skip_all, fields(bound = table.bound_count()))]
    pub fn update_bindings(&mut self, table: BindingTable) -> AppResult<()> {
        self.bindings = Arc::new(table);

        let saved = self.store.save(&self.bindings);
        if let Err(e) = &saved {
            error!(error = ?e, "Bindings changed in memory but were not saved");
        }

        let echo = SettingsMessage::CurrentBindings((*self.bindings).clone());
        if let Err(e) = self.settings.notify(echo) {
            warn!(error = ?e, "Failed to echo bindings to settings");
        }

        self.registrar.apply(&self.bindings);

        saved
    }

    /// Feed a playback lifecycle event to its controller.
    pub fn handle_playback_event(&mut self, event: SurfaceEvent) -> bool {
        self.playback.handle_event(event)
    }

    /// Feed a settings lifecycle event to its controller.
    pub fn handle_settings_event(&mut self, event: SurfaceEvent) -> bool {
        self.settings.handle_event(event)
    }

    /// Close every tracked surface.
    #[instrument(skip(self))]
    pub fn shutdown(&mut self) {
        let stopped = self.playback.teardown();
        let closed = self.settings.teardown();
        info!(
            playback_stopped = stopped,
            settings_closed = closed,
            "Surfaces shut down"
        );
    }

    /// Lifecycle phase of the playback surface.
    pub fn playback_phase(&self) -> SurfacePhase {
        self.playback.phase()
    }

    /// Lifecycle phase of the settings surface.
    pub fn settings_phase(&self) -> SurfacePhase {
        self.settings.phase()
    }
}
