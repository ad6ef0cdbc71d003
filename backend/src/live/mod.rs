//! Presence & delivery: the live half of the core.
//!
//! [`registry`] holds the process-wide userId → connection mapping;
//! [`hub`] layers authentication, presence broadcasts, and the
//! [`LiveDelivery`](crate::domain::ports::LiveDelivery) port on top of it.
//! Nothing here is persisted: after a restart every user is offline until
//! they authenticate again.

pub mod hub;
pub mod registry;

pub use hub::PresenceHub;
pub use registry::{ConnectionHandle, ConnectionId, ConnectionRegistry};
