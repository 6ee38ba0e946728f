//! Embedded HTTP server for the settings page.

use crate::{
    AppCommand, AppError, AppResult,
    settings::{ClientMessage, Outbound, ServerMessage, Session, SettingsHub, SettingsMessage},
};

use se_hotkeys_core::{SurfaceEvent, SurfaceId};

use std::panic::Location;

use axum::{
    Router,
    extract::{
        Query, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use error_location::ErrorLocation;
use serde::Deserialize;
use tokio::{
    net::TcpListener,
    sync::{mpsc, watch},
};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

const SETTINGS_PAGE: &str = include_str!("../../resources/settings.html");

#[derive(Clone)]
struct ServerState {
    hub: SettingsHub,
    command_tx: mpsc::Sender<AppCommand>,
}

#[derive(Debug, Deserialize)]
struct SessionQuery {
    surface: Uuid,
}

/// Bind the settings listener on `127.0.0.1:port`.
///
/// Done before the server task is spawned so a taken port is reported to the
/// caller instead of ending a detached task.
#[instrument]
pub async fn bind(port: u16) -> AppResult<TcpListener> {
    let listener = TcpListener::bind(("127.0.0.1", port))
        .await
        .map_err(|e| AppError::ServerError {
            reason: format!("Failed to bind port {}: {}", port, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    info!(port = port, "Settings server listening");

    Ok(listener)
}

/// Serve the settings page on `listener` until shutdown.
#[instrument(skip_all)]
pub async fn serve(
    listener: TcpListener,
    hub: SettingsHub,
    command_tx: mpsc::Sender<AppCommand>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> AppResult<()> {
    axum::serve(listener, router(hub, command_tx))
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        })
        .await
        .map_err(|e| AppError::ServerError {
            reason: format!("Settings server failed: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    info!("Settings server stopped");

    Ok(())
}

fn router(hub: SettingsHub, command_tx: mpsc::Sender<AppCommand>) -> Router {
    Router::new()
        .route("/", get(settings_page))
        .route("/ws", get(settings_socket))
        .layer(TraceLayer::new_for_http())
        .with_state(ServerState { hub, command_tx })
}

async fn settings_page() -> Html<&'static str> {
    Html(SETTINGS_PAGE)
}

async fn settings_socket(
    ws: WebSocketUpgrade,
    Query(query): Query<SessionQuery>,
    State(state): State<ServerState>,
) -> Response {
    let id = SurfaceId::from(query.surface);

    if let Some(session) = state.hub.claim(id) {
        return ws.on_upgrade(move |socket| run_session(socket, id, session, state));
    }

    if let Some(handoff) = state.hub.handoff(id) {
        return ws.on_upgrade(move |socket| async move {
            if handoff.send(socket).await.is_err() {
                debug!(surface_id = %id, "Settings session ended before hand-off");
            }
        });
    }

    warn!(surface_id = %id, "Refusing settings session that is not waiting");
    StatusCode::GONE.into_response()
}

#[instrument(skip(socket, session, state))]
async fn run_session(
    mut socket: WebSocket,
    id: SurfaceId,
    session: Session,
    state: ServerState,
) {
    let Session {
        mut outbox,
        mut handoffs,
    } = session;
    let command_tx = state.command_tx;
    let mut last_sent: Option<SettingsMessage> = None;

    info!("Settings session attached");

    loop {
        tokio::select! {
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    if let Err(e) = forward_client_message(text.as_str(), id, &command_tx).await {
                        warn!(error = ?e, "Failed to handle settings message");
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(error = %e, "Settings socket error");
                    break;
                }
            },
            outgoing = outbox.recv() => match outgoing {
                Some(Outbound::Message(message)) => {
                    let delivered = send_message(&mut socket, &message).await;
                    last_sent = Some(message);
                    if !delivered {
                        break;
                    }
                }
                Some(Outbound::Close) | None => {
                    let _ = socket.send(Message::Close(None)).await;
                    break;
                }
            },
            Some(replacement) = handoffs.recv() => {
                let _ = socket.send(Message::Close(None)).await;
                socket = replacement;
                info!("Settings session moved to a reopened page");
                if let Some(message) = &last_sent
                    && !send_message(&mut socket, message).await
                {
                    break;
                }
            }
        }
    }

    state.hub.release(id);

    if command_tx
        .send(AppCommand::SettingsEvent(SurfaceEvent::Closed(id)))
        .await
        .is_err()
    {
        debug!("Application gone before settings session closed");
    }

    info!("Settings session closed");
}

/// Encode and send one frame. Returns `false` once the socket is gone.
async fn send_message(socket: &mut WebSocket, message: &SettingsMessage) -> bool {
    let text = match serde_json::to_string(&ServerMessage::from(message.clone())) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "Failed to encode settings message");
            return true;
        }
    };
    socket.send(Message::Text(text.into())).await.is_ok()
}

/// Turn one page frame into an application command.
pub(crate) async fn forward_client_message(
    text: &str,
    id: SurfaceId,
    command_tx: &mpsc::Sender<AppCommand>,
) -> AppResult<()> {
    let message: ClientMessage =
        serde_json::from_str(text).map_err(|e| AppError::ServerError {
            reason: format!("Malformed settings message: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let command = match message {
        ClientMessage::Ready => AppCommand::SettingsEvent(SurfaceEvent::Ready(id)),
        ClientMessage::UpdateBindings { table } => AppCommand::UpdateBindings {
            surface_id: id,
            table,
        },
    };

    command_tx
        .send(command)
        .await
        .map_err(|e| AppError::ChannelSendFailed {
            message: format!("Failed to forward settings message: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
}
