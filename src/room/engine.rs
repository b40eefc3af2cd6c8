use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::room::{RoomSnapshot, RoomState, Stroke};

/// Every room known to the process, keyed by the client-supplied room id
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<String, RoomState>,
}

impl RoomRegistry {
    /// Look up a room, creating an empty one on first reference.
    /// The flag is true when the room was created by this call.
    pub fn get_or_create(&mut self, room_id: &str) -> (&mut RoomState, bool) {
        match self.rooms.entry(room_id.to_string()) {
            Entry::Occupied(entry) => (entry.into_mut(), false),
            Entry::Vacant(entry) => (entry.insert(RoomState::new()), true),
        }
    }

    pub fn get(&self, room_id: &str) -> Option<&RoomState> {
        self.rooms.get(room_id)
    }

    pub fn get_mut(&mut self, room_id: &str) -> Option<&mut RoomState> {
        self.rooms.get_mut(room_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RoomState)> {
        self.rooms.iter().map(|(id, state)| (id.as_str(), state))
    }
}

/// Per-room counters exposed for introspection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomSummary {
    pub room_id: String,
    pub strokes: usize,
    pub current_index: i64,
}

/// Owns the room registry and applies the four room operations.
///
/// Each operation takes the registry lock for its whole duration, so no
/// caller can observe a half-applied change. Rooms never interact.
#[derive(Clone, Default)]
pub struct RoomEngine {
    registry: Arc<RwLock<RoomRegistry>>,
}

impl RoomEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of a room, creating it empty if unseen
    pub async fn ensure_room(&self, room_id: &str) -> RoomSnapshot {
        let mut registry = self.registry.write().await;
        let (room, created) = registry.get_or_create(room_id);
        if created {
            tracing::debug!("Created room {}", room_id);
        }
        room.snapshot()
    }

    /// Append a stroke, invalidating any redo tail
    pub async fn append_stroke(&self, room_id: &str, stroke: Stroke) -> RoomSnapshot {
        let mut registry = self.registry.write().await;
        let (room, created) = registry.get_or_create(room_id);
        if created {
            tracing::debug!("Created room {} on first stroke", room_id);
        }

        let discarded = room.append(stroke);
        if discarded > 0 {
            tracing::debug!("Room {}: discarded {} undone strokes", room_id, discarded);
        }
        room.snapshot()
    }

    /// Returns `None` for an unknown room or when nothing is left to undo
    pub async fn undo(&self, room_id: &str) -> Option<RoomSnapshot> {
        let mut registry = self.registry.write().await;
        let room = registry.get_mut(room_id)?;
        if !room.undo() {
            tracing::debug!("Room {}: nothing to undo", room_id);
            return None;
        }
        Some(room.snapshot())
    }

    /// Returns `None` for an unknown room or when nothing is left to redo
    pub async fn redo(&self, room_id: &str) -> Option<RoomSnapshot> {
        let mut registry = self.registry.write().await;
        let room = registry.get_mut(room_id)?;
        if !room.redo() {
            tracing::debug!("Room {}: nothing to redo", room_id);
            return None;
        }
        Some(room.snapshot())
    }

    /// Reset a room. An unknown room is reported as cleared without
    /// being added to the registry.
    pub async fn clear(&self, room_id: &str) -> RoomSnapshot {
        let mut registry = self.registry.write().await;
        if let Some(room) = registry.get_mut(room_id) {
            room.clear();
        }
        RoomSnapshot::empty()
    }

    /// Read-only view of a room, `None` if it was never referenced
    pub async fn snapshot(&self, room_id: &str) -> Option<RoomSnapshot> {
        let registry = self.registry.read().await;
        registry.get(room_id).map(RoomState::snapshot)
    }

    /// Summaries of all rooms, sorted by room id
    pub async fn summaries(&self) -> Vec<RoomSummary> {
        let registry = self.registry.read().await;
        let mut summaries: Vec<RoomSummary> = registry
            .iter()
            .map(|(room_id, state)| RoomSummary {
                room_id: room_id.to_string(),
                strokes: state.stroke_count(),
                current_index: state.cursor(),
            })
            .collect();
        summaries.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        summaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stroke(room_id: &str, tag: &str) -> Stroke {
        Stroke::new(json!({ "room_id": room_id, "tag": tag }))
    }

    #[test]
    fn test_get_or_create_reports_creation() {
        let mut registry = RoomRegistry::default();

        let (_, created) = registry.get_or_create("r1");
        assert!(created);
        let (room, created) = registry.get_or_create("r1");
        assert!(!created);
        assert_eq!(room.stroke_count(), 0);
        assert_eq!(registry.iter().count(), 1);
    }

    #[tokio::test]
    async fn test_ensure_room_creates_empty_room() {
        let engine = RoomEngine::new();

        let snapshot = engine.ensure_room("r1").await;
        assert_eq!(snapshot, RoomSnapshot::empty());
        assert_eq!(engine.summaries().await.len(), 1);

        // second reference does not reset anything
        engine.append_stroke("r1", stroke("r1", "a")).await;
        let snapshot = engine.ensure_room("r1").await;
        assert_eq!(snapshot.current_index, 0);
        assert_eq!(engine.summaries().await.len(), 1);
    }

    #[tokio::test]
    async fn test_append_creates_room_on_demand() {
        let engine = RoomEngine::new();

        let snapshot = engine.append_stroke("fresh", stroke("fresh", "a")).await;
        assert_eq!(snapshot.drawings, vec![stroke("fresh", "a")]);
        assert_eq!(snapshot.current_index, 0);
        assert!(engine.snapshot("fresh").await.is_some());
    }

    #[tokio::test]
    async fn test_unknown_room_operations_are_noops() {
        let engine = RoomEngine::new();

        assert!(engine.undo("ghost").await.is_none());
        assert!(engine.redo("ghost").await.is_none());
        assert!(engine.snapshot("ghost").await.is_none());

        let cleared = engine.clear("ghost").await;
        assert_eq!(cleared, RoomSnapshot::empty());
        assert_eq!(engine.summaries().await.len(), 0);
    }

    #[tokio::test]
    async fn test_undo_and_redo_boundaries() {
        let engine = RoomEngine::new();
        engine.ensure_room("r1").await;

        assert!(engine.undo("r1").await.is_none());
        assert!(engine.redo("r1").await.is_none());

        engine.append_stroke("r1", stroke("r1", "a")).await;
        assert!(engine.redo("r1").await.is_none());

        let undone = engine.undo("r1").await.unwrap();
        assert_eq!(undone.current_index, -1);
        assert_eq!(undone.drawings.len(), 1);

        let redone = engine.redo("r1").await.unwrap();
        assert_eq!(redone.current_index, 0);
    }

    #[tokio::test]
    async fn test_room_isolation() {
        let engine = RoomEngine::new();
        engine.append_stroke("A", stroke("A", "a1")).await;
        engine.append_stroke("B", stroke("B", "b1")).await;
        engine.append_stroke("B", stroke("B", "b2")).await;
        let b_before = engine.snapshot("B").await;

        engine.undo("A").await;
        engine.append_stroke("A", stroke("A", "a2")).await;
        engine.clear("A").await;

        assert_eq!(engine.snapshot("B").await, b_before);
        assert_eq!(engine.snapshot("A").await, Some(RoomSnapshot::empty()));
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_serialized() {
        let engine = RoomEngine::new();
        let mut handles = Vec::new();

        for i in 0..32 {
            let engine = engine.clone();
            handles.push(tokio::spawn(async move {
                engine
                    .append_stroke("busy", stroke("busy", &i.to_string()))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let snapshot = engine.snapshot("busy").await.unwrap();
        assert_eq!(snapshot.drawings.len(), 32);
        assert_eq!(snapshot.current_index, 31);
    }

    #[tokio::test]
    async fn test_summaries_sorted_by_room_id() {
        let engine = RoomEngine::new();
        engine.ensure_room("zeta").await;
        engine.append_stroke("alpha", stroke("alpha", "a")).await;

        let summaries = engine.summaries().await;
        assert_eq!(
            summaries,
            vec![
                RoomSummary {
                    room_id: "alpha".to_string(),
                    strokes: 1,
                    current_index: 0,
                },
                RoomSummary {
                    room_id: "zeta".to_string(),
                    strokes: 0,
                    current_index: -1,
                },
            ]
        );
    }
}
