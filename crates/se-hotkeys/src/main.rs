//! SE Hotkeys: play sound effects from anywhere with global hotkeys.
//!
//! `Shift+Ctrl+Alt+1` to `9` play the sound bound to that digit and
//! `Shift+Ctrl+Alt+0` stops it. Bindings are edited in a settings page opened
//! from the tray icon.

mod app;
mod app_command;
mod config;
mod dispatcher;
mod error;
mod hotkey_action;
mod hotkey_handler;
mod hotkey_registrar;
mod host;
mod logging;
mod settings;
#[cfg(test)]
mod tests;
mod tray_command;
mod tray_icon_state;
mod tray_manager;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    dispatcher::Dispatcher,
    error::{AppError, Result as AppResult},
    hotkey_action::{HotkeyAction, HotkeyActions},
    hotkey_handler::HotkeyHandler,
    hotkey_registrar::HotkeyRegistrar,
    host::Host,
    tray_command::TrayCommand,
    tray_icon_state::TrayIconState,
    tray_manager::TrayManager,
};

use crate::{
    config::{Config, ConfigStore},
    settings::{SettingsHub, SettingsLauncher},
};

use se_hotkeys_core::{EventSink, PlaybackLauncher};

use std::sync::Arc;

use global_hotkey::GlobalHotKeyManager;
use tao::{
    event::{Event, StartCause},
    event_loop::{ControlFlow, EventLoopBuilder},
};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, warn};

/// Application entry point.
fn main() {
    // Moved into the event loop closure so buffered log lines get flushed
    // when it is dropped on exit.
    let log_guard = logging::init();

    #[cfg_attr(not(target_os = "macos"), allow(unused_mut))]
    let mut event_loop = EventLoopBuilder::<TrayCommand>::with_user_event().build();

    // No dock icon; the app lives in the tray.
    #[cfg(target_os = "macos")]
    {
        use tao::platform::macos::{ActivationPolicy, EventLoopExtMacOS};
        event_loop.set_activation_policy(ActivationPolicy::Accessory);
    }

    let tray_proxy = event_loop.create_proxy();

    // TrayManager lives on the main thread - TrayIcon is !Send on all platforms.
    let mut tray_manager: Option<TrayManager> = None;

    // Persists across event loop iterations; dropping it unregisters the chords.
    let mut hotkey_manager: Option<GlobalHotKeyManager> = None;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(cmd) => match cmd {
                TrayCommand::SetState(state) => {
                    if let Some(tray_manager) = tray_manager.as_mut()
                        && let Err(e) = tray_manager.update_state(state)
                    {
                        error!(error = ?e, "Failed to update tray icon");
                    }
                }
                TrayCommand::Shutdown => {
                    *control_flow = ControlFlow::ExitWithCode(0);
                }
            },
            Event::NewEvents(StartCause::Init) => {
                let config = match Config::load() {
                    Ok(c) => c,
                    Err(e) => {
                        error!("Failed to load config: {:?}", e);
                        std::process::exit(1);
                    }
                };

                let store = match ConfigStore::user_default() {
                    Ok(store) => store,
                    Err(e) => {
                        error!("Failed to locate bindings file: {:?}", e);
                        std::process::exit(1);
                    }
                };

                let (command_tx, command_rx) = mpsc::channel(32);
                let (shutdown_tx, shutdown_rx) = watch::channel(false);
                let (registrar, actions_rx) = HotkeyRegistrar::new();

                // Playback workers are plain threads, so blocking_send is safe.
                let playback_tx = command_tx.clone();
                let playback_events: EventSink = Arc::new(move |event| {
                    if playback_tx
                        .blocking_send(AppCommand::PlaybackEvent(event))
                        .is_err()
                    {
                        debug!("Application gone, dropping playback event");
                    }
                });
                let playback_launcher =
                    PlaybackLauncher::new(config.playback.volume, playback_events);

                let hub = SettingsHub::default();
                let settings_launcher = SettingsLauncher::new(hub.clone(), config.settings_url());

                let host = match Host::start(store, registrar, playback_launcher, settings_launcher)
                {
                    Ok(host) => host,
                    Err(e) => {
                        error!("Failed to load bindings: {:?}", e);
                        std::process::exit(1);
                    }
                };

                // Register chords on the main thread; tao's event loop pumps
                // the Windows messages needed for WM_HOTKEY delivery.
                let (manager, conflicts) = match HotkeyRegistrar::register_chords() {
                    Ok(pair) => pair,
                    Err(e) => {
                        error!("Failed to register hotkeys: {:?}", e);
                        std::process::exit(1);
                    }
                };
                hotkey_manager = Some(manager);

                for conflict in &conflicts {
                    warn!(error = ?conflict, "Chord unavailable");
                }
                let attention = !conflicts.is_empty();

                let tray = match TrayManager::new() {
                    Ok(tm) => tm,
                    Err(e) => {
                        error!("Failed to create TrayManager: {:?}", e);
                        std::process::exit(1);
                    }
                };

                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                let settings_menu_id = tray.settings_item_id().clone();
                let quit_menu_id = tray.quit_item_id().clone();
                tray_manager = Some(tray);

                let tray_proxy = tray_proxy.clone();

                // Spawn tokio runtime on separate thread.
                // TrayManager and hotkey_manager stay on the main thread.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(async {
                        let hotkey_handler = HotkeyHandler::new(actions_rx, command_tx.clone());

                        let app = App {
                            dispatcher: Dispatcher::new(host, attention),
                            hub,
                            tray_proxy,
                            config,
                            command_tx,
                            command_rx,
                            shutdown_tx,
                            settings_menu_id,
                            quit_menu_id,
                            tray_state: TrayIconState::Idle,
                        };

                        tokio::join!(
                            async {
                                if let Err(e) = hotkey_handler.run(shutdown_rx).await {
                                    error!(error = ?e, "Hotkey handler error");
                                }
                            },
                            async {
                                if let Err(e) = app.run().await {
                                    error!(error = ?e, "App error");
                                }
                            }
                        );
                    });
                });
            }
            _ => {}
        }

        // Keep hotkey_manager and the log guard alive in the closure for the
        // app's lifetime.
        let _ = (&hotkey_manager, &log_guard);
    });
}
