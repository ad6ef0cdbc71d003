//! Notification inbox service.
//!
//! Creation of notifications happens on the hub's fire-and-forget path;
//! this service only covers the read/acknowledge surface the embedding
//! layer exposes to users.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::{DomainResult, Error};
use crate::domain::ids::{NotificationId, UserId};
use crate::domain::notification::Notification;
use crate::domain::ports::{
    NotificationQuery, NotificationRepository, NotificationRepositoryError,
};

fn map_repository_error(error: NotificationRepositoryError) -> Error {
    match &error {
        NotificationRepositoryError::NotificationNotFound { .. }
        | NotificationRepositoryError::UnknownUser { .. } => Error::not_found(error.to_string()),
        NotificationRepositoryError::Storage { .. } => Error::internal(error.to_string()),
    }
}

/// Notification service implementing the inbox driving port.
#[derive(Clone)]
pub struct NotificationService<R> {
    notifications: Arc<R>,
}

impl<R> NotificationService<R> {
    /// Create the service over a notification repository.
    pub fn new(notifications: Arc<R>) -> Self {
        Self { notifications }
    }
}

#[async_trait]
impl<R> NotificationQuery for NotificationService<R>
where
    R: NotificationRepository,
{
    async fn list(&self, user_id: UserId) -> DomainResult<Vec<Notification>> {
        self.notifications
            .list_for_user(user_id)
            .await
            .map_err(map_repository_error)
    }

    async fn unread_count(&self, user_id: UserId) -> DomainResult<u64> {
        self.notifications
            .unread_count(user_id)
            .await
            .map_err(map_repository_error)
    }

    async fn mark_read(
        &self,
        notification_id: NotificationId,
        user_id: UserId,
    ) -> DomainResult<Notification> {
        self.notifications
            .mark_read(notification_id, user_id)
            .await
            .map_err(map_repository_error)
    }
}
