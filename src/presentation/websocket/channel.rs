use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use uuid::Uuid;

/// Identity of one streaming connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        ConnectionId(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Send failure on a delivery channel. Never propagated past the caller;
/// the reaction is always to unregister the offending connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("connection closed")]
    Closed,
    #[error("outbound queue full")]
    Backpressure,
}

/// Outbound delivery channel for one streaming connection.
///
/// Wraps the connection's mpsc sender; a forwarder task owned by the
/// connection handler drains the receiving end into the actual socket.
/// Sends are non-blocking and never panic or raise: a closed or congested
/// transport surfaces as a [`ChannelError`].
#[derive(Debug, Clone)]
pub struct ClientChannel {
    id: ConnectionId,
    connected_at: DateTime<Utc>,
    tx: mpsc::Sender<String>,
}

impl ClientChannel {
    pub fn new(tx: mpsc::Sender<String>) -> Self {
        ClientChannel {
            id: ConnectionId::new(),
            connected_at: Utc::now(),
            tx,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Queue one frame for delivery without blocking.
    pub fn send(&self, frame: String) -> Result<(), ChannelError> {
        if !self.is_open() {
            return Err(ChannelError::Closed);
        }

        self.tx.try_send(frame).map_err(|e| match e {
            TrySendError::Closed(_) => ChannelError::Closed,
            TrySendError::Full(_) => ChannelError::Backpressure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_delivers_frame() {
        let (tx, mut rx) = mpsc::channel(4);
        let channel = ClientChannel::new(tx);

        channel.send("hello".to_string()).unwrap();
        assert_eq!(rx.recv().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_send_after_receiver_dropped_is_closed() {
        let (tx, rx) = mpsc::channel(4);
        let channel = ClientChannel::new(tx);
        drop(rx);

        assert!(!channel.is_open());
        assert_eq!(
            channel.send("hello".to_string()),
            Err(ChannelError::Closed)
        );
    }

    #[tokio::test]
    async fn test_send_into_full_queue_is_backpressure() {
        let (tx, _rx) = mpsc::channel(1);
        let channel = ClientChannel::new(tx);

        channel.send("first".to_string()).unwrap();
        assert_eq!(
            channel.send("second".to_string()),
            Err(ChannelError::Backpressure)
        );
    }

    #[test]
    fn test_connection_ids_are_unique() {
        assert_ne!(ConnectionId::new(), ConnectionId::new());
    }
}
