use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::broadcaster::QuoteBroadcaster;
use super::channel::ClientChannel;
use super::message::{ClientMessage, ServerMessage};

/// Shared state for the streaming endpoint.
pub struct WsState {
    pub broadcaster: Arc<QuoteBroadcaster>,
    /// Capacity of each connection's outbound queue.
    pub channel_capacity: usize,
}

/// Handle the WebSocket upgrade on `/ws`.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<WsState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one streaming connection from upgrade to close.
///
/// The receive loop has a single exit, so the connection unregisters
/// exactly once no matter how many close or error events the transport
/// produces.
async fn handle_socket(socket: WebSocket, state: Arc<WsState>) {
    let (mut sender, mut receiver) = socket.split();

    // Outbound queue; a forwarder task drains it into the socket so sends
    // from the broadcast loop never block on a slow peer.
    let (tx, mut rx) = mpsc::channel::<String>(state.channel_capacity);

    let send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    let channel = ClientChannel::new(tx.clone());
    let id = channel.id();
    tracing::info!(connection = %id, "websocket client connected");

    // Join the fan-out, then push one snapshot right away so the new
    // viewer does not wait out the current publish period.
    state.broadcaster.register(channel.clone());
    state.broadcaster.push_snapshot(&channel).await;

    while let Some(Ok(msg)) = receiver.next().await {
        if let Message::Text(text) = msg {
            handle_client_message(&text, &channel);
        }
    }

    state.broadcaster.unregister(id);
    tracing::info!(connection = %id, "websocket client disconnected");

    drop(tx);
    let _ = send_task.await;
}

/// Dispatch one inbound control frame.
///
/// No inbound frame is connection-fatal: unparseable or unrecognized
/// messages are logged and ignored.
fn handle_client_message(text: &str, channel: &ClientChannel) {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::Subscribe { symbols }) => {
            // Accepted but inert: delivery scope never narrows.
            tracing::info!(connection = %channel.id(), ?symbols, "client subscribed");
        }
        Ok(ClientMessage::Unsubscribe { symbols }) => {
            tracing::info!(connection = %channel.id(), ?symbols, "client unsubscribed");
        }
        Ok(ClientMessage::Ping) => {
            let pong = ServerMessage::pong(Utc::now().timestamp_millis());
            if let Ok(frame) = pong.to_json() {
                if let Err(err) = channel.send(frame) {
                    tracing::warn!(%err, connection = %channel.id(), "failed to queue pong");
                }
            }
        }
        Err(parse_err) => match serde_json::from_str::<serde_json::Value>(text) {
            Ok(value) => {
                let message_type = value
                    .get("type")
                    .and_then(|t| t.as_str())
                    .unwrap_or("<missing>");
                tracing::warn!(connection = %channel.id(), message_type, "ignoring unsupported message");
            }
            Err(_) => {
                tracing::error!(connection = %channel.id(), error = %parse_err, "malformed websocket message");
            }
        },
    }
}
