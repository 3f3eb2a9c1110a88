//! WebSocket handler for live message delivery.
//!
//! `GET /ws?username=alice` upgrades to a WebSocket. On upgrade the
//! connection is attached to the [`ConnectionTable`] (minting its
//! handle) and, when a username was supplied, registered with the
//! presence registry. An anonymous session stays attached but receives
//! nothing -- there is no identity to route to.
//!
//! The socket task multiplexes two directions with `tokio::select!`:
//! frames queued by the fan-out router are pushed to the client, and
//! incoming frames are watched for close. On any exit path the
//! connection is detached and presence unregistered by handle, so a
//! stale disconnect can never evict a newer registration for the same
//! username.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::debug;

use crate::state::AppState;

/// Query parameters for the WebSocket upgrade.
#[derive(Debug, Deserialize)]
pub struct ConnectParams {
    /// Identity to register presence for. Optional: an unauthenticated
    /// session has nothing useful to register.
    pub username: Option<String>,
}

/// Upgrade an HTTP request to a WebSocket connection.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws_connection(socket, state, params.username))
}

/// Core WebSocket connection handler.
async fn handle_ws_connection(socket: WebSocket, state: AppState, username: Option<String>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let (handle, mut outbound) = state.connections.attach();
    state.messaging.on_connect(username.as_deref(), handle);
    debug!(username = ?username, %handle, "websocket connected");

    loop {
        tokio::select! {
            // --- Branch 1: Push routed messages to the client ---
            frame = outbound.recv() => {
                match frame {
                    Some(frame) => {
                        if ws_sender.send(Message::Text(frame.into())).await.is_err() {
                            // Client disconnected
                            break;
                        }
                    }
                    // Connection was detached elsewhere; nothing more to pump.
                    None => break,
                }
            }

            // --- Branch 2: Watch the client side for close ---
            msg_result = ws_receiver.next() => {
                match msg_result {
                    Some(Ok(Message::Close(_))) | None => {
                        break;
                    }
                    Some(Err(err)) => {
                        debug!(%handle, "websocket receive error: {err}");
                        break;
                    }
                    // Clients only listen on this socket; sends go over
                    // HTTP. Ignore text/binary and protocol frames.
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    state.connections.detach(handle);
    state.messaging.on_disconnect(handle);
    debug!(%handle, "websocket disconnected");
}
