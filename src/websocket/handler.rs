use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::websocket::message::ClientEvent;
use crate::websocket::{Gateway, Session};

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(gateway): State<Gateway>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, gateway))
}

/// Handle a WebSocket connection for its whole lifetime
async fn handle_socket(socket: WebSocket, gateway: Gateway) {
    let (mut sender, mut receiver) = socket.split();

    // Outgoing frames are queued here and written by a dedicated task
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    let session_id = Uuid::new_v4();
    gateway.connect(session_id, Session::new(tx)).await;
    tracing::info!(
        "Client connected: {} ({} sessions)",
        session_id,
        gateway.session_count().await
    );

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                handle_text_message(&gateway, session_id, &text).await;
            }
            Ok(Message::Close(_)) => {
                tracing::debug!("Client {} sent close frame", session_id);
                break;
            }
            Ok(Message::Binary(_)) => {
                tracing::warn!("Client {} sent binary frame (ignored)", session_id);
            }
            Ok(_) => {
                // ping/pong is answered by axum
            }
            Err(e) => {
                tracing::warn!("WebSocket error for client {}: {}", session_id, e);
                break;
            }
        }
    }

    let rooms = gateway.disconnect(session_id).await;
    send_task.abort();
    tracing::info!("Client disconnected: {} (left {} rooms)", session_id, rooms.len());
}

/// Decode one frame and apply it. Malformed frames are dropped.
async fn handle_text_message(gateway: &Gateway, session_id: Uuid, text: &str) {
    match ClientEvent::parse(text) {
        Ok(event) => {
            tracing::trace!("Client {} -> room {:?}: {:?}", session_id, event.room_id(), event);
            gateway.dispatch(session_id, event).await;
        }
        Err(e) => {
            tracing::warn!("Dropped frame from {}: {}", session_id, e);
        }
    }
}
