use dashmap::DashMap;

use super::channel::{ClientChannel, ConnectionId};

/// The authoritative set of currently live delivery channels.
///
/// Membership is the only shared mutable state in the broadcast core.
/// Mutation is add/remove only; fan-out iterates over a point-in-time
/// snapshot of the membership so a channel removing itself mid-broadcast
/// never skips or double-visits another entry.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    channels: DashMap<ConnectionId, ClientChannel>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        ConnectionRegistry {
            channels: DashMap::new(),
        }
    }

    pub fn insert(&self, channel: ClientChannel) {
        self.channels.insert(channel.id(), channel);
    }

    /// Remove a channel; removing an absent id is a no-op, not an error.
    pub fn remove(&self, id: ConnectionId) -> bool {
        self.channels.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Point-in-time snapshot of the membership for one fan-out pass.
    pub fn channels(&self) -> Vec<ClientChannel> {
        self.channels.iter().map(|e| e.value().clone()).collect()
    }
}
