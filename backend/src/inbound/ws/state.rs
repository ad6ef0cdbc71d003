//! Shared WebSocket adapter state.
//!
//! The session loop depends on the presence hub (authentication, presence,
//! delivery) and on domain driving ports for everything else, so the actor
//! stays free of business logic and testable with doubles.

use std::sync::Arc;

use crate::domain::ports::MessagingCommand;
use crate::live::PresenceHub;

/// Dependency bundle for the WebSocket entry point and session loops.
#[derive(Clone)]
pub struct WsState {
    pub hub: Arc<PresenceHub>,
    pub messaging: Arc<dyn MessagingCommand>,
    /// Exact-match Origin allow-list; empty means any origin is accepted
    /// (development mode).
    pub allowed_origins: Arc<[String]>,
}

impl WsState {
    /// Construct state from explicit implementations.
    pub fn new(
        hub: Arc<PresenceHub>,
        messaging: Arc<dyn MessagingCommand>,
        allowed_origins: Vec<String>,
    ) -> Self {
        Self {
            hub,
            messaging,
            allowed_origins: allowed_origins.into(),
        }
    }
}
