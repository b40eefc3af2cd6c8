use axum::extract::ws::Message;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::websocket::message::ServerEvent;
use crate::websocket::Session;

/// Connected sessions and the rooms each one has joined
#[derive(Debug, Default)]
pub struct Hub {
    sessions: HashMap<Uuid, Session>,
    rooms: HashMap<String, HashSet<Uuid>>,
    joined: HashMap<Uuid, HashSet<String>>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self, id: Uuid, session: Session) {
        self.sessions.insert(id, session);
    }

    /// Forget a session and drop it from every room.
    /// Returns the rooms it was a member of.
    pub fn disconnect(&mut self, id: &Uuid) -> Vec<String> {
        self.sessions.remove(id);
        let rooms: Vec<String> = self
            .joined
            .remove(id)
            .map(|rooms| rooms.into_iter().collect())
            .unwrap_or_default();

        for room_id in &rooms {
            if let Some(members) = self.rooms.get_mut(room_id) {
                members.remove(id);
                if members.is_empty() {
                    self.rooms.remove(room_id);
                }
            }
        }
        rooms
    }

    /// Add a session to a room. Returns false if it was already a member.
    pub fn join(&mut self, id: Uuid, room_id: &str) -> bool {
        let added = self
            .rooms
            .entry(room_id.to_string())
            .or_default()
            .insert(id);
        if added {
            self.joined
                .entry(id)
                .or_default()
                .insert(room_id.to_string());
        }
        added
    }

    pub fn member_count(&self, room_id: &str) -> usize {
        self.rooms.get(room_id).map_or(0, HashSet::len)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Send an event to a single session
    pub fn send_to(&self, id: &Uuid, event: &ServerEvent) -> bool {
        let Some(session) = self.sessions.get(id) else {
            return false;
        };
        match encode(event) {
            Some(message) => session.send(message),
            None => false,
        }
    }

    /// Send an event to every member of a room. Returns how many sessions got it.
    pub fn broadcast(&self, room_id: &str, event: &ServerEvent) -> usize {
        self.deliver(room_id, event, None)
    }

    /// Send an event to every member of a room except one
    pub fn broadcast_except(&self, room_id: &str, event: &ServerEvent, except: &Uuid) -> usize {
        self.deliver(room_id, event, Some(except))
    }

    fn deliver(&self, room_id: &str, event: &ServerEvent, except: Option<&Uuid>) -> usize {
        let Some(members) = self.rooms.get(room_id) else {
            return 0;
        };
        let Some(message) = encode(event) else {
            return 0;
        };

        members
            .iter()
            .filter(|id| Some(*id) != except)
            .filter_map(|id| self.sessions.get(id))
            .filter(|session| session.send(message.clone()))
            .count()
    }
}

fn encode(event: &ServerEvent) -> Option<Message> {
    match event.to_ws_message() {
        Ok(message) => Some(message),
        Err(e) => {
            tracing::warn!("Failed to encode outgoing event: {}", e);
            None
        }
    }
}
