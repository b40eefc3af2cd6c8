use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::room::{RoomEngine, RoomSummary};
use crate::websocket::message::{ClientEvent, ServerEvent};
use crate::websocket::{Hub, Session};

/// Room summary plus the number of connected members
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomInfo {
    #[serde(flatten)]
    pub summary: RoomSummary,
    pub members: usize,
}

/// Binds the room engine to connected sessions.
///
/// The hub lock is held while an event is applied and its broadcasts are
/// queued, so every member sees the room's updates in the order they were
/// applied. Lock order is hub, then registry.
#[derive(Clone)]
pub struct Gateway {
    engine: RoomEngine,
    hub: Arc<Mutex<Hub>>,
}

impl Gateway {
    pub fn new(engine: RoomEngine) -> Self {
        Self {
            engine,
            hub: Arc::new(Mutex::new(Hub::new())),
        }
    }

    pub async fn connect(&self, session_id: Uuid, session: Session) {
        self.hub.lock().await.connect(session_id, session);
    }

    /// Drop a session from every room it joined. Room state is kept.
    pub async fn disconnect(&self, session_id: Uuid) -> Vec<String> {
        self.hub.lock().await.disconnect(&session_id)
    }

    pub async fn session_count(&self) -> usize {
        self.hub.lock().await.session_count()
    }

    /// Apply one client event and queue the resulting broadcasts
    pub async fn dispatch(&self, session_id: Uuid, event: ClientEvent) {
        let mut hub = self.hub.lock().await;

        match event {
            ClientEvent::JoinRoom(room_id) => {
                // membership and room creation happen under the same hub lock
                if hub.join(session_id, &room_id) {
                    tracing::info!("Session {} joined room {}", session_id, room_id);
                }
                let snapshot = self.engine.ensure_room(&room_id).await;
                hub.send_to(&session_id, &ServerEvent::InitState(snapshot));
            }
            ClientEvent::DrawLine { room_id, stroke } => {
                let snapshot = self.engine.append_stroke(&room_id, stroke.clone()).await;
                hub.broadcast_except(&room_id, &ServerEvent::DrawLine(stroke), &session_id);
                hub.broadcast(&room_id, &ServerEvent::UpdateState(snapshot));
            }
            ClientEvent::CompleteDrawing(room_id) => {
                if let Some(snapshot) = self.engine.snapshot(&room_id).await {
                    hub.broadcast(&room_id, &ServerEvent::UpdateState(snapshot));
                }
            }
            ClientEvent::Undo(room_id) => {
                if let Some(snapshot) = self.engine.undo(&room_id).await {
                    hub.broadcast(&room_id, &ServerEvent::UpdateState(snapshot));
                }
            }
            ClientEvent::Redo(room_id) => {
                if let Some(snapshot) = self.engine.redo(&room_id).await {
                    hub.broadcast(&room_id, &ServerEvent::UpdateState(snapshot));
                }
            }
            ClientEvent::ClearBoard(room_id) => {
                self.engine.clear(&room_id).await;
                tracing::info!("Room {} cleared by session {}", room_id, session_id);
                hub.broadcast(&room_id, &ServerEvent::BoardCleared(room_id.clone()));
            }
        }
    }

    /// Every known room with its current member count
    pub async fn room_infos(&self) -> Vec<RoomInfo> {
        let hub = self.hub.lock().await;
        self.engine
            .summaries()
            .await
            .into_iter()
            .map(|summary| {
                let members = hub.member_count(&summary.room_id);
                RoomInfo { summary, members }
            })
            .collect()
    }
}
