//! Global hotkey handler.
//!
//! Listens for the ten `Shift+Ctrl+Alt+<digit>` chords and turns each press
//! into an [`AppCommand`] using the action snapshot published by the
//! [`HotkeyRegistrar`](crate::HotkeyRegistrar).

use crate::{AppCommand, AppError, AppResult, HotkeyAction, HotkeyActions};

use std::{panic::Location, sync::Arc, time::Duration};

use error_location::ErrorLocation;
use global_hotkey::{GlobalHotKeyEvent, HotKeyState};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Global hotkey handler.
pub struct HotkeyHandler {
    actions_rx: watch::Receiver<Arc<HotkeyActions>>,
    command_tx: mpsc::Sender<AppCommand>,
}

impl HotkeyHandler {
    /// Create a handler reading actions from `actions_rx`.
    ///
    /// This struct is `Send` and can live on any thread; it only listens on
    /// the global [`GlobalHotKeyEvent`] channel.
    pub fn new(
        actions_rx: watch::Receiver<Arc<HotkeyActions>>,
        command_tx: mpsc::Sender<AppCommand>,
    ) -> Self {
        Self {
            actions_rx,
            command_tx,
        }
    }

    /// Run the hotkey handler event loop.
    ///
    /// This method blocks until a shutdown signal is received.
    #[instrument(skip_all)]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let receiver = GlobalHotKeyEvent::receiver().clone();
        let (event_tx, mut event_rx) = mpsc::channel(32);

        // Single persistent blocking task that forwards hotkey events.
        // GlobalHotKeyEvent::receiver() returns a crossbeam_channel::Receiver
        // which has blocking recv(), so there is no polling.
        //
        // Shutdown: when event_rx is dropped (loop breaks), the next
        // event_tx.blocking_send() fails, breaking the blocking loop.
        let handle = tokio::task::spawn_blocking(move || {
            while let Ok(event) = receiver.recv() {
                if event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Hotkey handler shutting down");
                    break;
                }
                Some(event) = event_rx.recv() => {
                    if event.state == HotKeyState::Pressed {
                        self.handle_hotkey_press(event.id).await?;
                    }
                }
            }
        }

        drop(event_rx);

        // Best-effort join: the blocking task may be stuck in recv() until the
        // next hotkey event. The runtime cleans it up on exit regardless.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Hotkey event forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Hotkey event forwarder task panicked"),
            Err(_) => debug!(
                "Hotkey event forwarder did not stop within timeout, \
                   will be cleaned up on exit"
            ),
        }

        Ok(())
    }

    /// Forward the action bound to `hotkey_id` to the application.
    #[instrument(skip(self))]
    pub(crate) async fn handle_hotkey_press(&self, hotkey_id: u32) -> AppResult<()> {
        let action = self.actions_rx.borrow().get(hotkey_id).cloned();

        let Some(action) = action else {
            debug!("Hotkey not bound to an action");
            return Ok(());
        };

        let command = match action {
            HotkeyAction::Play { slot, path } => AppCommand::PlaySound { slot, path },
            HotkeyAction::Stop => AppCommand::StopPlayback,
        };

        debug!(command = ?command, "Hotkey pressed");

        self.command_tx
            .send(command)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send hotkey command: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
