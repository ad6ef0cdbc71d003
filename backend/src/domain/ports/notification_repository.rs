//! Port for stored notification persistence.
//!
//! Callers on the primary path treat failures from this port as
//! secondary: they log and continue. The port itself still reports them
//! faithfully.

use async_trait::async_trait;

use crate::domain::ids::{NotificationId, UserId};
use crate::domain::notification::{Notification, NotificationKind};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification repository adapters.
    pub enum NotificationRepositoryError {
        /// No notification with this id belongs to the user.
        NotificationNotFound { notification_id: NotificationId } =>
            "notification {notification_id} not found",
        /// The user has no registered profile.
        UnknownUser { user_id: UserId } =>
            "user {user_id} is not registered",
        /// The underlying store failed.
        Storage { message: String } =>
            "notification store failure: {message}",
    }
}

/// Input for persisting one notification.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDraft {
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
}

/// Port for writing and reading stored notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persist a notification, assigning its id and timestamp.
    async fn insert(
        &self,
        draft: NotificationDraft,
    ) -> Result<Notification, NotificationRepositoryError>;

    /// Notifications for a user, newest first.
    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;

    /// Count of unread notifications for a user.
    async fn unread_count(&self, user_id: UserId) -> Result<u64, NotificationRepositoryError>;

    /// Mark a notification read. Fails with `NotificationNotFound` unless
    /// it exists and belongs to `user_id`.
    async fn mark_read(
        &self,
        notification_id: NotificationId,
        user_id: UserId,
    ) -> Result<Notification, NotificationRepositoryError>;
}
