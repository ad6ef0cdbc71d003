//! Driving port for reading and acknowledging stored notifications.

use async_trait::async_trait;

use crate::domain::error::DomainResult;
use crate::domain::ids::{NotificationId, UserId};
use crate::domain::notification::Notification;

/// Driving port for the notification inbox.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationQuery: Send + Sync {
    /// Notifications for a user, newest first.
    async fn list(&self, user_id: UserId) -> DomainResult<Vec<Notification>>;

    /// Count of unread notifications.
    async fn unread_count(&self, user_id: UserId) -> DomainResult<u64>;

    /// Mark one of the user's notifications read.
    async fn mark_read(
        &self,
        notification_id: NotificationId,
        user_id: UserId,
    ) -> DomainResult<Notification>;
}
