//! Notification store over the shared in-process store.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    NotificationDraft, NotificationRepository, NotificationRepositoryError,
};
use crate::domain::{Notification, NotificationId, UserId};

use super::store::CollaborationStore;

/// In-process implementation of the notification repository port.
#[derive(Debug, Clone)]
pub struct MemoryNotificationRepository {
    store: CollaborationStore,
}

impl MemoryNotificationRepository {
    /// Create the repository over a shared store.
    #[must_use]
    pub fn new(store: CollaborationStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl NotificationRepository for MemoryNotificationRepository {
    async fn insert(
        &self,
        draft: NotificationDraft,
    ) -> Result<Notification, NotificationRepositoryError> {
        let mut state = self.store.lock().await;
        if !state.profiles.contains_key(&draft.user_id) {
            return Err(NotificationRepositoryError::unknown_user(draft.user_id));
        }

        let notification = Notification {
            id: NotificationId::random(),
            user_id: draft.user_id,
            kind: draft.kind,
            title: draft.title,
            body: draft.body,
            is_read: false,
            created_at: Utc::now(),
        };
        state.notifications.push(notification.clone());
        Ok(notification)
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let state = self.store.lock().await;
        Ok(state
            .notifications
            .iter()
            .rev()
            .filter(|notification| notification.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn unread_count(&self, user_id: UserId) -> Result<u64, NotificationRepositoryError> {
        let state = self.store.lock().await;
        Ok(state
            .notifications
            .iter()
            .filter(|notification| notification.user_id == user_id && !notification.is_read)
            .count() as u64)
    }

    async fn mark_read(
        &self,
        notification_id: NotificationId,
        user_id: UserId,
    ) -> Result<Notification, NotificationRepositoryError> {
        let mut state = self.store.lock().await;
        let notification = state
            .notifications
            .iter_mut()
            .find(|notification| {
                notification.id == notification_id && notification.user_id == user_id
            })
            .ok_or_else(|| {
                NotificationRepositoryError::notification_not_found(notification_id)
            })?;
        notification.is_read = true;
        Ok(notification.clone())
    }
}
