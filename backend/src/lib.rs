//! Crewlink backend: the collaboration consistency & real-time delivery
//! engine.
//!
//! The crate keeps each user's collaboration state (active-project count,
//! reputation score) consistent under concurrent operations and reflects
//! state changes live to connected clients:
//!
//! - [`domain`] — aggregates, the membership state machine, the reputation
//!   ledger, the ranking engine, messaging, and the ports they meet the
//!   outside world through.
//! - [`live`] — the presence registry and delivery hub.
//! - [`inbound`] — WebSocket and operational HTTP adapters.
//! - [`outbound`] — in-process implementations of the driven ports.
//! - [`server`] — composition root and bootstrap.

pub mod domain;
pub mod inbound;
pub mod live;
pub mod outbound;
pub mod server;
