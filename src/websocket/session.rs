use axum::extract::ws::Message;
use tokio::sync::mpsc::UnboundedSender;

/// Outbound half of one client connection
#[derive(Debug, Clone)]
pub struct Session {
    sender: UnboundedSender<Message>,
}

impl Session {
    pub fn new(sender: UnboundedSender<Message>) -> Self {
        Self { sender }
    }

    /// Queue a frame for this client.
    /// Returns false if the connection's writer has gone away.
    pub fn send(&self, message: Message) -> bool {
        self.sender.send(message).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_send_after_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Session::new(tx);

        assert!(session.send(Message::Text("hello".to_string())));
        drop(rx);
        assert!(!session.send(Message::Text("hello".to_string())));
    }
}
