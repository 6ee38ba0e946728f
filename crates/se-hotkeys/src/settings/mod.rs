//! Settings surface: a browser page served locally and attached over a
//! WebSocket session.

mod message;
pub(crate) mod server;
mod surface;

pub(crate) use {
    message::{ClientMessage, ServerMessage, SettingsMessage},
    server::{bind, serve},
    surface::{Outbound, Session, SettingsHub, SettingsLauncher},
};
