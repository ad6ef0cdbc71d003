//! Presence hub: authentication, presence broadcasts, and delivery.
//!
//! Owns the connection registry for its lifetime. Implements the domain's
//! [`LiveDelivery`] port so services can push events without knowing about
//! connections. Presence broadcasts and notification persistence are
//! secondary effects: failures are logged and never surface to the
//! operation that triggered them.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    LiveDelivery, NotificationDraft, NotificationRepository, TokenVerifier,
};
use crate::domain::{DomainResult, Error, LiveEvent, NotificationKind, UserId};
use crate::live::registry::{ConnectionHandle, ConnectionId, ConnectionRegistry};

/// Presence and delivery hub.
pub struct PresenceHub {
    registry: ConnectionRegistry,
    verifier: Arc<dyn TokenVerifier>,
    notifications: Arc<dyn NotificationRepository>,
}

impl PresenceHub {
    /// Create a hub with an empty registry; every user starts offline.
    pub fn new(
        verifier: Arc<dyn TokenVerifier>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            verifier,
            notifications,
        }
    }

    /// Verify a token and register the connection under the resolved user.
    ///
    /// Last authenticate wins: a previous connection for the same user is
    /// displaced, which closes its event channel and lets its session task
    /// shut the old socket down. On success a presence-online event is
    /// broadcast best-effort to every connection.
    pub async fn authenticate(
        &self,
        handle: ConnectionHandle,
        token: &str,
    ) -> DomainResult<UserId> {
        let user_id = self
            .verifier
            .verify(token)
            .await
            .map_err(|err| Error::auth(err.to_string()))?;

        if let Some(displaced) = self.registry.register(user_id, handle) {
            info!(%user_id, old_connection = %displaced.id(), "displacing previous connection");
        }
        info!(%user_id, "connection authenticated");
        self.registry.broadcast(&LiveEvent::UserOnline { user_id });
        Ok(user_id)
    }

    /// Tear down a connection's registration, if it still owns it, and
    /// broadcast presence-offline when an entry was actually removed. A
    /// displaced connection's late disconnect is a no-op.
    pub async fn disconnect(&self, user_id: UserId, connection_id: ConnectionId) {
        if self.registry.unregister(user_id, connection_id) {
            info!(%user_id, "connection closed");
            self.registry.broadcast(&LiveEvent::UserOffline { user_id });
        }
    }

    /// Number of live connections, for diagnostics.
    #[must_use]
    pub fn online_count(&self) -> usize {
        self.registry.online_count()
    }
}

#[async_trait]
impl LiveDelivery for PresenceHub {
    async fn deliver(&self, user_id: UserId, event: LiveEvent) -> bool {
        match self.registry.lookup(user_id) {
            Some(handle) => handle.push(event),
            None => false,
        }
    }

    async fn is_online(&self, user_id: UserId) -> bool {
        self.registry.is_online(user_id)
    }

    async fn notify(&self, user_id: UserId, kind: NotificationKind, title: &str, body: &str) {
        match self
            .notifications
            .insert(NotificationDraft {
                user_id,
                kind,
                title: title.to_owned(),
                body: body.to_owned(),
            })
            .await
        {
            Ok(notification) => {
                self.deliver(user_id, LiveEvent::NewNotification { notification })
                    .await;
            }
            Err(error) => {
                warn!(%user_id, error = %error, "notification persistence failed; dropping");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tokio::sync::mpsc;

    use super::*;
    use crate::domain::ports::{
        MockNotificationRepository, MockTokenVerifier, NotificationRepositoryError,
        VerifyTokenError,
    };
    use crate::domain::Notification;
    use crate::domain::NotificationId;

    fn connection() -> (
        ConnectionHandle,
        mpsc::UnboundedReceiver<LiveEvent>,
        ConnectionId,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ConnectionId::new();
        (ConnectionHandle::new(id, tx), rx, id)
    }

    fn hub_accepting(user_id: UserId) -> PresenceHub {
        let mut verifier = MockTokenVerifier::new();
        verifier.expect_verify().returning(move |_| Ok(user_id));
        let mut notifications = MockNotificationRepository::new();
        notifications.expect_insert().returning(|draft| {
            Ok(Notification {
                id: NotificationId::random(),
                user_id: draft.user_id,
                kind: draft.kind,
                title: draft.title,
                body: draft.body,
                is_read: false,
                created_at: Utc::now(),
            })
        });
        PresenceHub::new(Arc::new(verifier), Arc::new(notifications))
    }

    #[tokio::test]
    async fn authenticated_connections_receive_deliveries() {
        let user_id = UserId::random();
        let hub = hub_accepting(user_id);
        let (handle, mut rx, _) = connection();

        let resolved = hub
            .authenticate(handle, "good-token")
            .await
            .expect("authentication succeeds");
        assert_eq!(resolved, user_id);
        // The registration broadcast reaches the new connection itself.
        assert_eq!(rx.recv().await, Some(LiveEvent::UserOnline { user_id }));

        assert!(
            hub.deliver(user_id, LiveEvent::UserTyping { user_id, is_typing: true })
                .await
        );
        assert_eq!(
            rx.recv().await,
            Some(LiveEvent::UserTyping {
                user_id,
                is_typing: true
            })
        );
    }

    #[tokio::test]
    async fn rejected_tokens_leave_the_user_offline() {
        let mut verifier = MockTokenVerifier::new();
        verifier
            .expect_verify()
            .returning(|_| Err(VerifyTokenError::invalid_token()));
        let hub = PresenceHub::new(
            Arc::new(verifier),
            Arc::new(MockNotificationRepository::new()),
        );
        let (handle, _rx, _) = connection();

        let error = hub
            .authenticate(handle, "bad-token")
            .await
            .expect_err("authentication fails");
        assert_eq!(error.code(), crate::domain::ErrorCode::Auth);
        assert_eq!(hub.online_count(), 0);
    }

    #[tokio::test]
    async fn delivery_after_disconnect_reaches_nothing() {
        let user_id = UserId::random();
        let hub = hub_accepting(user_id);
        let (handle, _rx, connection_id) = connection();

        hub.authenticate(handle, "good-token")
            .await
            .expect("authentication succeeds");
        hub.disconnect(user_id, connection_id).await;

        assert!(!hub.is_online(user_id).await);
        assert!(
            !hub.deliver(user_id, LiveEvent::UserOffline { user_id })
                .await
        );
    }

    #[tokio::test]
    async fn reconnect_displaces_the_old_session_and_survives_its_disconnect() {
        let user_id = UserId::random();
        let hub = hub_accepting(user_id);
        let (old_handle, _old_rx, old_id) = connection();
        let (new_handle, _new_rx, _) = connection();

        hub.authenticate(old_handle, "good-token")
            .await
            .expect("first authentication");
        hub.authenticate(new_handle, "good-token")
            .await
            .expect("second authentication");

        // The displaced session's cleanup fires after the reconnect; the
        // fresh registration must survive it.
        hub.disconnect(user_id, old_id).await;
        assert!(hub.is_online(user_id).await);
    }

    #[tokio::test]
    async fn notify_persists_then_delivers() {
        let user_id = UserId::random();
        let hub = hub_accepting(user_id);
        let (handle, mut rx, _) = connection();

        hub.authenticate(handle, "good-token")
            .await
            .expect("authentication succeeds");
        rx.recv().await; // presence broadcast

        hub.notify(user_id, NotificationKind::NewMessage, "New message", "hi")
            .await;

        match rx.recv().await {
            Some(LiveEvent::NewNotification { notification }) => {
                assert_eq!(notification.user_id, user_id);
                assert_eq!(notification.title, "New message");
                assert!(!notification.is_read);
            }
            other => panic!("expected a notification event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn notification_store_failures_are_swallowed() {
        let user_id = UserId::random();
        let mut verifier = MockTokenVerifier::new();
        verifier.expect_verify().returning(move |_| Ok(user_id));
        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_insert()
            .returning(|_| Err(NotificationRepositoryError::storage("disk full")));
        let hub = PresenceHub::new(Arc::new(verifier), Arc::new(notifications));
        let (handle, mut rx, _) = connection();

        hub.authenticate(handle, "good-token")
            .await
            .expect("authentication succeeds");
        rx.recv().await; // presence broadcast

        // Must not panic or surface the failure; nothing is delivered.
        hub.notify(user_id, NotificationKind::NewMessage, "New message", "hi")
            .await;
        assert!(rx.try_recv().is_err());
    }
}
