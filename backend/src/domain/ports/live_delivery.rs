//! Port through which domain services push live events and durable
//! notifications without knowing about connections or transports.
//!
//! Implemented by the presence hub. Delivery is best-effort: events for
//! offline users are dropped, and `notify` never surfaces its failures to
//! the caller (they are logged inside the implementation).

use async_trait::async_trait;

use crate::domain::events::LiveEvent;
use crate::domain::ids::UserId;
use crate::domain::notification::NotificationKind;

/// Port for best-effort live delivery and fire-and-forget notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LiveDelivery: Send + Sync {
    /// Push an event to the user's live connection if one is registered.
    /// Returns whether a connection accepted the event.
    async fn deliver(&self, user_id: UserId, event: LiveEvent) -> bool;

    /// Whether the user currently has a live connection.
    async fn is_online(&self, user_id: UserId) -> bool;

    /// Persist a notification and push it live when possible. Failures are
    /// logged and suppressed; the primary operation that triggered the
    /// notification must never fail because of them.
    async fn notify(&self, user_id: UserId, kind: NotificationKind, title: &str, body: &str);
}

/// Fixture implementation for tests that do not exercise live delivery.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLiveDelivery;

#[async_trait]
impl LiveDelivery for FixtureLiveDelivery {
    async fn deliver(&self, _user_id: UserId, _event: LiveEvent) -> bool {
        false
    }

    async fn is_online(&self, _user_id: UserId) -> bool {
        false
    }

    async fn notify(
        &self,
        _user_id: UserId,
        _kind: NotificationKind,
        _title: &str,
        _body: &str,
    ) {
    }
}
