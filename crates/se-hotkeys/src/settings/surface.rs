use crate::settings::SettingsMessage;

use se_hotkeys_core::{CoreResult, Surface, SurfaceError, SurfaceId, SurfaceLauncher};

use std::{
    io,
    panic::Location,
    sync::{Arc, Mutex},
};

use axum::extract::ws::WebSocket;
use error_location::ErrorLocation;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Frames queued for a settings session.
#[derive(Debug)]
pub enum Outbound {
    /// Forward a control message to the page.
    Message(SettingsMessage),
    /// Close the session.
    Close,
}

/// Server side of an attached settings session.
pub struct Session {
    /// Frames queued for the page.
    pub outbox: mpsc::Receiver<Outbound>,
    /// Sockets of newer tabs opened for the same session.
    pub handoffs: mpsc::Receiver<WebSocket>,
}

#[derive(Default)]
struct HubState {
    waiting: Option<(SurfaceId, mpsc::Receiver<Outbound>)>,
    attached: Option<(SurfaceId, mpsc::Sender<WebSocket>)>,
}

/// Hand-off point between the launcher and the settings server.
///
/// Holds the outbox of the most recently launched settings surface until its
/// page connects. Only one session can be waiting; a new launch replaces it.
/// Once attached, a page reopened for the same surface takes the session over
/// from the tab that held it.
#[derive(Clone, Default)]
pub struct SettingsHub {
    state: Arc<Mutex<HubState>>,
}

impl SettingsHub {
    fn park(&self, id: SurfaceId, outbox: mpsc::Receiver<Outbound>) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some((previous, _)) = state.waiting.replace((id, outbox)) {
            debug!(surface_id = %previous, "Discarded unclaimed settings session");
        }
    }

    /// Attach the session for `id` if it is the one waiting to connect.
    pub fn claim(&self, id: SurfaceId) -> Option<Session> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        match state.waiting.take() {
            Some((waiting_id, outbox)) if waiting_id == id => {
                let (handoff_tx, handoffs) = mpsc::channel(1);
                state.attached = Some((id, handoff_tx));
                Some(Session { outbox, handoffs })
            }
            other => {
                state.waiting = other;
                None
            }
        }
    }

    /// Where a new socket for the attached session `id` should be sent.
    pub fn handoff(&self, id: SurfaceId) -> Option<mpsc::Sender<WebSocket>> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        match &state.attached {
            Some((attached_id, handoff_tx)) if *attached_id == id => Some(handoff_tx.clone()),
            _ => None,
        }
    }

    /// Forget the attached session `id` once it has ended.
    pub fn release(&self, id: SurfaceId) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if matches!(&state.attached, Some((attached_id, _)) if *attached_id == id) {
            state.attached = None;
        }
    }
}

/// Handle to one settings page session.
pub struct SettingsSurface {
    id: SurfaceId,
    outbox: mpsc::Sender<Outbound>,
    url: String,
    opener: Opener,
}

impl Surface for SettingsSurface {
    type Message = SettingsMessage;

    fn id(&self) -> SurfaceId {
        self.id
    }

    #[track_caller]
    fn send(&self, message: SettingsMessage) -> CoreResult<()> {
        self.outbox
            .try_send(Outbound::Message(message))
            .map_err(|e| SurfaceError::SendFailed {
                reason: format!("Settings session unavailable: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    fn close(&self) {
        let _ = self.outbox.try_send(Outbound::Close);
    }

    /// Open the page again. The new tab takes the session over.
    #[track_caller]
    fn reveal(&self) -> CoreResult<()> {
        (self.opener)(&self.url).map_err(|e| SurfaceError::LaunchFailed {
            reason: format!("Failed to reopen settings page: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(url = %self.url, "Reopened settings page");

        Ok(())
    }
}

type Opener = Arc<dyn Fn(&str) -> io::Result<()> + Send + Sync>;

/// Opens settings pages in the default browser.
pub struct SettingsLauncher {
    hub: SettingsHub,
    base_url: String,
    opener: Opener,
}

impl SettingsLauncher {
    /// Launcher for pages served at `base_url`.
    pub fn new(hub: SettingsHub, base_url: String) -> Self {
        Self::with_opener(hub, base_url, Arc::new(|url: &str| open::that(url)))
    }

    /// Launcher that opens pages with `opener` instead of the browser.
    pub fn with_opener(hub: SettingsHub, base_url: String, opener: Opener) -> Self {
        Self {
            hub,
            base_url,
            opener,
        }
    }
}

impl SurfaceLauncher for SettingsLauncher {
    type Surface = SettingsSurface;

    fn kind(&self) -> &'static str {
        "settings"
    }

    #[track_caller]
    fn launch(&mut self, id: SurfaceId) -> CoreResult<SettingsSurface> {
        let (outbox_tx, outbox_rx) = mpsc::channel(8);
        self.hub.park(id, outbox_rx);

        let url = format!("{}/?surface={}", self.base_url, id);
        (self.opener)(&url).map_err(|e| SurfaceError::LaunchFailed {
            reason: format!("Failed to open settings page: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(url = %url, "Opened settings page");

        Ok(SettingsSurface {
            id,
            outbox: outbox_tx,
            url,
            opener: Arc::clone(&self.opener),
        })
    }
}
