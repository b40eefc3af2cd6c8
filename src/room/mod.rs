pub mod engine;
pub mod state;

pub use engine::{RoomEngine, RoomRegistry, RoomSummary};
pub use state::{RoomSnapshot, RoomState, Stroke};
