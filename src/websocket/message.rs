use axum::extract::ws::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::WhiteboardError;
use crate::room::{RoomSnapshot, Stroke};

/// Every frame on the socket is `{"event": <name>, "data": <payload>}`
#[derive(Debug, Deserialize)]
struct Frame {
    event: String,
    #[serde(default)]
    data: Value,
}

/// Events sent from client to server
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    JoinRoom(String),
    DrawLine { room_id: String, stroke: Stroke },
    CompleteDrawing(String),
    Undo(String),
    Redo(String),
    ClearBoard(String),
}

impl ClientEvent {
    pub fn parse(text: &str) -> Result<Self, WhiteboardError> {
        let frame: Frame = serde_json::from_str(text)?;
        let missing = || WhiteboardError::MissingRoomId(frame.event.clone());

        match frame.event.as_str() {
            "join_room" => Ok(Self::JoinRoom(room_ref(&frame.data).ok_or_else(missing)?)),
            "draw_line" => {
                let stroke = Stroke::new(frame.data.clone());
                let room_id = stroke
                    .room_id()
                    .filter(|room_id| !room_id.is_empty())
                    .ok_or_else(missing)?
                    .to_string();
                Ok(Self::DrawLine { room_id, stroke })
            }
            "complete_drawing" => Ok(Self::CompleteDrawing(
                object_room_id(&frame.data)
                    .filter(|room_id| !room_id.is_empty())
                    .ok_or_else(missing)?,
            )),
            "undo_action" => Ok(Self::Undo(room_ref(&frame.data).ok_or_else(missing)?)),
            "redo_action" => Ok(Self::Redo(room_ref(&frame.data).ok_or_else(missing)?)),
            "clear_board" => Ok(Self::ClearBoard(room_ref(&frame.data).ok_or_else(missing)?)),
            other => Err(WhiteboardError::UnknownEvent(other.to_string())),
        }
    }

    pub fn room_id(&self) -> &str {
        match self {
            Self::JoinRoom(room_id)
            | Self::CompleteDrawing(room_id)
            | Self::Undo(room_id)
            | Self::Redo(room_id)
            | Self::ClearBoard(room_id) => room_id,
            Self::DrawLine { room_id, .. } => room_id,
        }
    }
}

/// A room id given either as a bare string or as `{"room_id": ...}`.
/// Any string is a valid room id, including the empty one.
fn room_ref(data: &Value) -> Option<String> {
    match data {
        Value::String(room_id) => Some(room_id.clone()),
        Value::Object(_) => object_room_id(data),
        _ => None,
    }
}

fn object_room_id(data: &Value) -> Option<String> {
    data.get("room_id")?.as_str().map(str::to_string)
}

/// Events sent from server to client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Full room state, sent only to the client that just joined
    InitState(RoomSnapshot),
    /// One stroke relayed to everyone but its author
    DrawLine(Stroke),
    /// Authoritative room state after a change
    UpdateState(RoomSnapshot),
    /// The room was reset
    BoardCleared(String),
}

impl ServerEvent {
    pub fn to_ws_message(&self) -> Result<Message, WhiteboardError> {
        Ok(Message::Text(serde_json::to_string(self)?))
    }
}
