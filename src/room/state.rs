use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One drawing action as sent by a client. The payload is relayed untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stroke(Value);

impl Stroke {
    pub fn new(payload: Value) -> Self {
        Self(payload)
    }

    /// Room the stroke was drawn in, read from its `room_id` field
    pub fn room_id(&self) -> Option<&str> {
        self.0.get("room_id")?.as_str()
    }
}

/// Wire form of a room: the full log plus the index of the last active stroke.
///
/// Field names are the ones whiteboard clients already read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub drawings: Vec<Stroke>,
    pub current_index: i64,
}

impl RoomSnapshot {
    pub fn empty() -> Self {
        Self {
            drawings: Vec::new(),
            current_index: -1,
        }
    }
}

/// Stroke history of a single room.
///
/// `active` counts the strokes currently applied, so the cursor is
/// `active - 1` and can never point past the end of the log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomState {
    log: Vec<Stroke>,
    active: usize,
}

impl RoomState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the last active stroke, `-1` when nothing is applied
    pub fn cursor(&self) -> i64 {
        self.active as i64 - 1
    }

    /// Strokes in the log, undone ones included
    pub fn stroke_count(&self) -> usize {
        self.log.len()
    }

    /// Append a stroke, discarding any redo tail first.
    ///
    /// Returns how many undone strokes were discarded.
    pub fn append(&mut self, stroke: Stroke) -> usize {
        let discarded = self.drop_redo_tail();
        self.log.push(stroke);
        self.active = self.log.len();
        discarded
    }

    /// Step the cursor back. Returns false when nothing is active.
    pub fn undo(&mut self) -> bool {
        if self.active == 0 {
            return false;
        }
        self.active -= 1;
        true
    }

    /// Re-apply the next undone stroke. Returns false when there is none.
    pub fn redo(&mut self) -> bool {
        if self.active == self.log.len() {
            return false;
        }
        self.active += 1;
        true
    }

    pub fn clear(&mut self) {
        self.log.clear();
        self.active = 0;
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            drawings: self.log.clone(),
            current_index: self.cursor(),
        }
    }

    /// Drop every stroke with an index greater than the cursor.
    /// These strokes are gone for good.
    fn drop_redo_tail(&mut self) -> usize {
        let discarded = self.log.len() - self.active;
        self.log.truncate(self.active);
        discarded
    }
}
