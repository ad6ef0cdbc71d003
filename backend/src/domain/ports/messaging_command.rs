//! Driving port for the messaging channel.

use async_trait::async_trait;

use crate::domain::error::DomainResult;
use crate::domain::ids::{MessageId, UserId};
use crate::domain::message::Message;

/// Driving port for sending and reading direct messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagingCommand: Send + Sync {
    /// Persist and deliver a message. The persisted record is the sender's
    /// acknowledgement; live delivery and the receiver's notification are
    /// independent side effects.
    async fn send_message(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
        content: String,
    ) -> DomainResult<Message>;

    /// Mark a received message read and send the sender a read receipt when
    /// they are live.
    async fn mark_read(&self, message_id: MessageId, reader_id: UserId)
        -> DomainResult<Message>;

    /// Chronological conversation between two users, truncated to the most
    /// recent `limit` messages.
    async fn conversation(
        &self,
        user_id: UserId,
        peer_id: UserId,
        limit: usize,
    ) -> DomainResult<Vec<Message>>;
}
