use crate::{
    AppCommand, AppResult, Dispatcher, TrayCommand, TrayIconState,
    config::Config,
    settings::{self, SettingsHub, SettingsLauncher},
};

use se_hotkeys_core::PlaybackLauncher;

use std::time::Duration;

use tao::event_loop::EventLoopProxy;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};
use tray_icon::{
    MouseButton, MouseButtonState, TrayIconEvent,
    menu::{MenuEvent, MenuId},
};

/// Main application state.
///
/// Runs on the async runtime thread. Tray icon updates go back to the main
/// thread through `tray_proxy` because `TrayIcon` is `!Send` and must remain
/// on the UI thread.
pub struct App {
    pub(crate) dispatcher: Dispatcher<PlaybackLauncher, SettingsLauncher>,
    pub(crate) hub: SettingsHub,
    pub(crate) tray_proxy: EventLoopProxy<TrayCommand>,
    pub(crate) config: Config,
    pub(crate) command_tx: mpsc::Sender<AppCommand>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) settings_menu_id: MenuId,
    pub(crate) quit_menu_id: MenuId,
    pub(crate) tray_state: TrayIconState,
}

enum TrayInput {
    Menu(MenuEvent),
    Icon(TrayIconEvent),
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("SE Hotkeys starting");

        let server = match settings::bind(self.config.server.port).await {
            Ok(listener) => {
                let serving = settings::serve(
                    listener,
                    self.hub.clone(),
                    self.command_tx.clone(),
                    self.shutdown_tx.subscribe(),
                );
                let command_tx = self.command_tx.clone();
                Some(tokio::spawn(async move {
                    if let Err(e) = serving.await {
                        error!(error = ?e, "Settings server failed");
                        let _ = command_tx.send(AppCommand::SettingsServerDown).await;
                    }
                }))
            }
            Err(e) => {
                error!(error = ?e, "Settings server unavailable");
                self.dispatcher.settings_unavailable();
                None
            }
        };

        // Tray event forwarding via persistent blocking tasks.
        //
        // MenuEvent::receiver() and TrayIconEvent::receiver() return
        // crossbeam_channel::Receivers with a blocking recv(), so there is no
        // polling.
        //
        // Shutdown: when tray_event_rx is dropped (main loop breaks), the
        // next blocking_send() fails, breaking the blocking loops.
        let (tray_event_tx, mut tray_event_rx) = mpsc::channel(32);
        let menu_tx = tray_event_tx.clone();
        let menu_handle = tokio::task::spawn_blocking(move || {
            let receiver = MenuEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if menu_tx.blocking_send(TrayInput::Menu(event)).is_err() {
                    break;
                }
            }
        });
        let icon_handle = tokio::task::spawn_blocking(move || {
            let receiver = TrayIconEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if tray_event_tx.blocking_send(TrayInput::Icon(event)).is_err() {
                    break;
                }
            }
        });

        self.refresh_tray();

        loop {
            tokio::select! {
                Some(input) = tray_event_rx.recv() => {
                    match input {
                        TrayInput::Menu(event) => self.handle_menu_event(event).await,
                        TrayInput::Icon(event) => self.handle_icon_event(event),
                    }
                }

                Some(cmd) = self.command_rx.recv() => {
                    if !self.dispatcher.handle_command(cmd) {
                        info!("Shutdown requested");
                        break;
                    }
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }

            self.refresh_tray();
        }

        drop(tray_event_rx);

        self.dispatcher.shutdown();
        let _ = self.shutdown_tx.send(true);

        if let Some(server) = server {
            match tokio::time::timeout(Duration::from_secs(1), server).await {
                Ok(Ok(())) => debug!("Settings server task finished"),
                Ok(Err(e)) => error!(error = ?e, "Settings server task panicked"),
                Err(_) => debug!("Settings server did not stop within timeout"),
            }
        }

        for (name, handle) in [("menu", menu_handle), ("icon", icon_handle)] {
            match tokio::time::timeout(Duration::from_secs(1), handle).await {
                Ok(Ok(())) => debug!(forwarder = name, "Tray event forwarder stopped cleanly"),
                Ok(Err(e)) => error!(forwarder = name, error = ?e, "Tray event forwarder task panicked"),
                Err(_) => debug!(
                    forwarder = name,
                    "Tray event forwarder did not stop within timeout, \
                     will be cleaned up on exit"
                ),
            }
        }

        if self.tray_proxy.send_event(TrayCommand::Shutdown).is_err() {
            warn!("Event loop already gone");
        }

        info!("SE Hotkeys shut down successfully");

        Ok(())
    }

    /// Handle tray menu events.
    #[instrument(skip(self))]
    async fn handle_menu_event(&mut self, event: MenuEvent) {
        if event.id == self.settings_menu_id {
            self.dispatcher.open_settings();
        } else if event.id == self.quit_menu_id {
            info!("Quit requested from tray menu");
            if let Err(e) = self.command_tx.send(AppCommand::Shutdown).await {
                error!(error = ?e, "Failed to send shutdown command");
            }
        }
    }

    /// A left click on the icon opens settings, like the menu entry.
    fn handle_icon_event(&mut self, event: TrayIconEvent) {
        if let TrayIconEvent::Click {
            button: MouseButton::Left,
            button_state: MouseButtonState::Up,
            ..
        } = event
        {
            self.dispatcher.open_settings();
        }
    }

    fn refresh_tray(&mut self) {
        let state = self.dispatcher.tray_state();
        if state == self.tray_state {
            return;
        }

        if self.tray_proxy.send_event(TrayCommand::SetState(state)).is_err() {
            warn!("Event loop gone, tray state not updated");
            return;
        }

        debug!(state = ?state, "Tray state changed");
        self.tray_state = state;
    }
}
