use crate::config::BindingTable;

use serde::{Deserialize, Serialize};

/// Control message accepted by a settings surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsMessage {
    /// Show these bindings.
    CurrentBindings(BindingTable),
}

/// JSON frame sent to the settings page.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Bindings to display.
    CurrentBindings {
        /// The full table.
        table: BindingTable,
    },
}

impl From<SettingsMessage> for ServerMessage {
    fn from(message: SettingsMessage) -> Self {
        match message {
            SettingsMessage::CurrentBindings(table) => ServerMessage::CurrentBindings { table },
        }
    }
}

/// JSON frame received from the settings page.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// The page is loaded and listening.
    Ready,
    /// The user submitted a full replacement table.
    UpdateBindings {
        /// The new bindings.
        table: BindingTable,
    },
}
