//! System tray icon with state-based updates.
//!
//! Shows one of three icons (Idle, Playing, Attention) and a context menu
//! with Settings and Quit.

use crate::{AppError, AppResult, TrayIconState};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{info, instrument};
use tray_icon::{
    Icon, TrayIcon, TrayIconBuilder,
    menu::{Menu, MenuId, MenuItem, PredefinedMenuItem},
};

/// System tray icon manager.
pub struct TrayManager {
    tray_icon: TrayIcon,
    state: TrayIconState,
    settings_item_id: MenuId,
    quit_item_id: MenuId,
}

impl TrayManager {
    /// Create the tray icon in the idle state.
    ///
    /// On macOS this must run after the event loop has started.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let menu = Menu::new();

        let settings_item = MenuItem::new("Settings", true, None);
        let quit_item = MenuItem::new("Quit", true, None);

        let settings_id = settings_item.id().clone();
        let quit_id = quit_item.id().clone();

        menu.append_items(&[&settings_item, &PredefinedMenuItem::separator(), &quit_item])
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to build tray menu: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let state = TrayIconState::Idle;

        let tray_icon = TrayIconBuilder::new()
            .with_tooltip(state.tooltip())
            .with_menu(Box::new(menu))
            .with_menu_on_left_click(false)
            .with_icon(Self::load_icon(state)?)
            .build()
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("System tray icon initialized");

        Ok(Self {
            tray_icon,
            state,
            settings_item_id: settings_id,
            quit_item_id: quit_id,
        })
    }

    /// Switch icon and tooltip to `state`.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn update_state(&mut self, state: TrayIconState) -> AppResult<()> {
        if state == self.state {
            return Ok(());
        }

        self.tray_icon
            .set_icon(Some(Self::load_icon(state)?))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.tray_icon
            .set_tooltip(Some(state.tooltip()))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update tooltip: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.state = state;

        Ok(())
    }

    /// Load icon from compile-time embedded PNG bytes.
    #[track_caller]
    fn load_icon(state: TrayIconState) -> AppResult<Icon> {
        let png_bytes: &[u8] = match state {
            TrayIconState::Idle => include_bytes!("../resources/icons/idle.png"),
            TrayIconState::Playing => include_bytes!("../resources/icons/playing.png"),
            TrayIconState::Attention => include_bytes!("../resources/icons/attention.png"),
        };

        let img = image::load_from_memory(png_bytes).map_err(|e| AppError::TrayError {
            reason: format!("Failed to decode embedded icon: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let rgba = img.into_rgba8();
        let (width, height) = (rgba.width(), rgba.height());

        Icon::from_rgba(rgba.into_raw(), width, height).map_err(|e| AppError::TrayError {
            reason: format!("Failed to create icon from RGBA: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Get the settings menu item ID.
    pub fn settings_item_id(&self) -> &MenuId {
        &self.settings_item_id
    }

    /// Get the quit menu item ID.
    pub fn quit_item_id(&self) -> &MenuId {
        &self.quit_item_id
    }
}
