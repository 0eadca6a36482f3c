use serde::{Deserialize, Serialize};

use crate::domain::{Quote, Snapshot};

/// Inbound control message, tagged by `type`.
///
/// `subscribe`/`unsubscribe` carry a symbol list but are acknowledged at the
/// log level only; delivery scope never changes (every connection receives
/// every quote).
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Subscribe {
        #[serde(default)]
        symbols: Vec<String>,
    },
    Unsubscribe {
        #[serde(default)]
        symbols: Vec<String>,
    },
    Ping,
}

/// Outbound frame, tagged by `type`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// One broadcast snapshot; `timestamp` is ISO-8601 with milliseconds.
    LiveData {
        data: Vec<Quote>,
        timestamp: String,
    },
    /// Reply to an inbound `ping`; `timestamp` is epoch milliseconds.
    Pong { timestamp: i64 },
}

impl ServerMessage {
    pub fn live_data(snapshot: &Snapshot) -> Self {
        ServerMessage::LiveData {
            data: snapshot.quotes().to_vec(),
            timestamp: snapshot.timestamp_rfc3339(),
        }
    }

    pub fn pong(timestamp: i64) -> Self {
        ServerMessage::Pong { timestamp }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
