//! Process-wide connection registry.
//!
//! Maps a user to at most one live connection handle. The map is sharded
//! (`DashMap`), so operations for different users never block one another,
//! while entry operations on the same key are strictly ordered. The
//! rapid-reconnect race is closed by tagging each handle with a connection
//! id: teardown removes an entry only when it still belongs to the closing
//! connection.

use std::fmt;

use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::{LiveEvent, UserId};

/// Identity of one physical connection, distinct from the user it
/// authenticates as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a fresh connection id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Sending side of one connection's event channel. Cloneable; the receiving
/// half lives in the connection's session task. Once every handle for a
/// connection is dropped the session task observes the closed channel and
/// shuts the socket down.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    sender: mpsc::UnboundedSender<LiveEvent>,
}

impl ConnectionHandle {
    /// Pair a connection id with its event sender.
    #[must_use]
    pub fn new(id: ConnectionId, sender: mpsc::UnboundedSender<LiveEvent>) -> Self {
        Self { id, sender }
    }

    /// The connection's identity.
    #[must_use]
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Push an event to the connection. Returns false when the session task
    /// has already gone away.
    pub fn push(&self, event: LiveEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

/// Registry of live connections, one entry per online user.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: DashMap<UserId, ConnectionHandle>,
}

impl ConnectionRegistry {
    /// Create an empty registry; every user starts offline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user's connection. Last registration wins: the displaced
    /// handle, if any, is returned so the caller can tear the old
    /// connection down.
    pub fn register(&self, user_id: UserId, handle: ConnectionHandle) -> Option<ConnectionHandle> {
        self.connections.insert(user_id, handle)
    }

    /// Remove the user's entry, but only when it still belongs to
    /// `connection_id`. A stale disconnect from a displaced connection is a
    /// no-op. Returns whether an entry was removed.
    pub fn unregister(&self, user_id: UserId, connection_id: ConnectionId) -> bool {
        self.connections
            .remove_if(&user_id, |_, handle| handle.id() == connection_id)
            .is_some()
    }

    /// The user's current connection handle, if any.
    #[must_use]
    pub fn lookup(&self, user_id: UserId) -> Option<ConnectionHandle> {
        self.connections.get(&user_id).map(|entry| entry.value().clone())
    }

    /// Whether the user currently has a live connection.
    #[must_use]
    pub fn is_online(&self, user_id: UserId) -> bool {
        self.connections.contains_key(&user_id)
    }

    /// Push an event to every live connection, best-effort.
    pub fn broadcast(&self, event: &LiveEvent) {
        for entry in self.connections.iter() {
            entry.value().push(event.clone());
        }
    }

    /// Number of live connections.
    #[must_use]
    pub fn online_count(&self) -> usize {
        self.connections.len()
    }
}
