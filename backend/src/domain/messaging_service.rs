//! Direct messaging service.
//!
//! The message row is persisted first so it has a stable id and timestamp;
//! live delivery to the receiver and the receiver's stored notification are
//! independent side effects. The notification runs on its own task so a
//! slow or failing notification store can never fail or delay the send.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::{DomainResult, Error};
use crate::domain::events::LiveEvent;
use crate::domain::ids::{MessageId, UserId};
use crate::domain::message::{Message, MessageContent};
use crate::domain::notification::NotificationKind;
use crate::domain::ports::{
    LiveDelivery, MessageDraft, MessageRepository, MessageRepositoryError, MessagingCommand,
};

/// Longest message prefix quoted inside the receiver's notification body.
const NOTIFICATION_PREVIEW_MAX: usize = 80;

fn map_repository_error(error: MessageRepositoryError) -> Error {
    match &error {
        MessageRepositoryError::MessageNotFound { .. }
        | MessageRepositoryError::UnknownUser { .. } => Error::not_found(error.to_string()),
        MessageRepositoryError::Storage { .. } => Error::internal(error.to_string()),
    }
}

fn notification_preview(content: &MessageContent) -> String {
    let text = content.as_ref();
    if text.chars().count() <= NOTIFICATION_PREVIEW_MAX {
        return text.to_owned();
    }
    let truncated: String = text.chars().take(NOTIFICATION_PREVIEW_MAX).collect();
    format!("{truncated}…")
}

/// Messaging service implementing the messaging driving port.
#[derive(Clone)]
pub struct MessagingService<R> {
    messages: Arc<R>,
    live: Arc<dyn LiveDelivery>,
}

impl<R> MessagingService<R> {
    /// Create the service over a message repository and the delivery hub.
    pub fn new(messages: Arc<R>, live: Arc<dyn LiveDelivery>) -> Self {
        Self { messages, live }
    }
}

#[async_trait]
impl<R> MessagingCommand for MessagingService<R>
where
    R: MessageRepository,
{
    async fn send_message(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
        content: String,
    ) -> DomainResult<Message> {
        let content =
            MessageContent::new(content).map_err(|err| Error::validation(err.to_string()))?;

        let message = self
            .messages
            .insert(MessageDraft {
                sender_id,
                receiver_id,
                content,
            })
            .await
            .map_err(map_repository_error)?;

        self.live
            .deliver(
                receiver_id,
                LiveEvent::NewMessage {
                    message: message.clone(),
                },
            )
            .await;

        let live = Arc::clone(&self.live);
        let body = notification_preview(&message.content);
        tokio::spawn(async move {
            live.notify(receiver_id, NotificationKind::NewMessage, "New message", &body)
                .await;
        });

        Ok(message)
    }

    async fn mark_read(
        &self,
        message_id: MessageId,
        reader_id: UserId,
    ) -> DomainResult<Message> {
        let message = self
            .messages
            .mark_read(message_id, reader_id)
            .await
            .map_err(map_repository_error)?;

        self.live
            .deliver(
                message.sender_id,
                LiveEvent::MessageRead {
                    message_id: message.id,
                    read_by: reader_id,
                },
            )
            .await;

        Ok(message)
    }

    async fn conversation(
        &self,
        user_id: UserId,
        peer_id: UserId,
        limit: usize,
    ) -> DomainResult<Vec<Message>> {
        self.messages
            .conversation(user_id, peer_id, limit)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "messaging_service_tests.rs"]
mod tests;
