use axum::{extract::State, Json};
use serde::Serialize;

use crate::websocket::{Gateway, RoomInfo};

#[derive(Debug, Serialize)]
pub struct Health {
    pub message: &'static str,
}

/// Liveness check
pub async fn health() -> Json<Health> {
    Json(Health {
        message: "Whiteboard Server",
    })
}

/// List every room with its stroke count, cursor and members
pub async fn rooms(State(gateway): State<Gateway>) -> Json<Vec<RoomInfo>> {
    Json(gateway.room_infos().await)
}
