//! # Relay Socket Handler
//!
//! WebSocket endpoint for the presence relay. Each connection gets an
//! outbound queue drained by a send task while a receive task parses
//! inbound frames and hands them to the relay; whichever task finishes
//! first tears the other down and the connection leaves every channel.

use crate::relay::{ConnId, PresenceRelay};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use shared::dto::events::{ClientEvent, ServerEvent};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// WebSocket handler for the presence relay.
///
/// **Route**: `GET /api/ws`
///
/// The connection carries JSON frames in the
/// `{"event": ..., "data": ...}` envelope; identity is established by the
/// first `setup` event rather than at upgrade time.
pub async fn relay_websocket(
    ws: WebSocketUpgrade,
    State(relay): State<Arc<PresenceRelay>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, relay))
}

async fn handle_socket(socket: WebSocket, relay: Arc<PresenceRelay>) {
    let conn_id: ConnId = Uuid::new_v4();
    let connection_start = Instant::now();
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    info!(conn = %conn_id, "[WS] CONNECTED");

    // Drain the outbound queue into the socket
    let send_conn = conn_id;
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    warn!(conn = %send_conn, error = %e, "[WS] outbound event serialization failed");
                    continue;
                }
            };

            if let Err(e) = sink.send(Message::Text(json.into())).await {
                debug!(conn = %send_conn, error = %e, "[WS] send failed, closing");
                break;
            }
        }
    });

    // Parse inbound frames and hand them to the relay
    let recv_relay = relay.clone();
    let recv_tx = tx.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(frame) = stream.next().await {
            match frame {
                Ok(Message::Text(text)) => match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(event) => recv_relay.handle_event(conn_id, &recv_tx, event).await,
                    Err(e) => {
                        warn!(conn = %conn_id, error = %e, "[WS] unrecognized frame ignored");
                    }
                },
                Ok(Message::Close(_)) => {
                    debug!(conn = %conn_id, "[WS] close frame received");
                    break;
                }
                // Transport-level frames; axum answers pings itself
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) | Ok(Message::Binary(_)) => {}
                Err(e) => {
                    warn!(conn = %conn_id, error = %e, "[WS] receive error");
                    break;
                }
            }
        }
    });

    // Whichever side finishes first tears down the other
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    // Transport-level cleanup of channel membership
    relay.disconnect(conn_id).await;

    info!(
        conn = %conn_id,
        duration_ms = connection_start.elapsed().as_millis(),
        "[WS] DISCONNECTED"
    );
}
