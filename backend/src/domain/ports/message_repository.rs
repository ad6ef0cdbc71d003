//! Port for direct message persistence.

use async_trait::async_trait;

use crate::domain::ids::{MessageId, UserId};
use crate::domain::message::{Message, MessageContent};

use super::define_port_error;

define_port_error! {
    /// Errors raised by message repository adapters.
    pub enum MessageRepositoryError {
        /// No message with this id belongs to the reader as receiver.
        MessageNotFound { message_id: MessageId } =>
            "message {message_id} not found",
        /// The user has no registered profile.
        UnknownUser { user_id: UserId } =>
            "user {user_id} is not registered",
        /// The underlying store failed.
        Storage { message: String } =>
            "message store failure: {message}",
    }
}

/// Input for persisting one message.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDraft {
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: MessageContent,
}

/// Port for writing and reading direct messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a message, assigning its id and timestamp.
    async fn insert(&self, draft: MessageDraft) -> Result<Message, MessageRepositoryError>;

    /// Mark a message read. Fails with `MessageNotFound` unless the message
    /// exists and `reader_id` is its receiver.
    async fn mark_read(
        &self,
        message_id: MessageId,
        reader_id: UserId,
    ) -> Result<Message, MessageRepositoryError>;

    /// The chronological conversation between two users, truncated to the
    /// most recent `limit` messages.
    async fn conversation(
        &self,
        user_id: UserId,
        peer_id: UserId,
        limit: usize,
    ) -> Result<Vec<Message>, MessageRepositoryError>;
}
