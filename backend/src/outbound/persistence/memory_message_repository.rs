//! Message store over the shared in-process store.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{MessageDraft, MessageRepository, MessageRepositoryError};
use crate::domain::{Message, MessageId, UserId};

use super::store::CollaborationStore;

/// In-process implementation of the message repository port.
#[derive(Debug, Clone)]
pub struct MemoryMessageRepository {
    store: CollaborationStore,
}

impl MemoryMessageRepository {
    /// Create the repository over a shared store.
    #[must_use]
    pub fn new(store: CollaborationStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MessageRepository for MemoryMessageRepository {
    async fn insert(&self, draft: MessageDraft) -> Result<Message, MessageRepositoryError> {
        let mut state = self.store.lock().await;
        for user_id in [draft.sender_id, draft.receiver_id] {
            if !state.profiles.contains_key(&user_id) {
                return Err(MessageRepositoryError::unknown_user(user_id));
            }
        }

        let message = Message {
            id: MessageId::random(),
            sender_id: draft.sender_id,
            receiver_id: draft.receiver_id,
            content: draft.content,
            is_read: false,
            created_at: Utc::now(),
        };
        state.messages.push(message.clone());
        Ok(message)
    }

    async fn mark_read(
        &self,
        message_id: MessageId,
        reader_id: UserId,
    ) -> Result<Message, MessageRepositoryError> {
        let mut state = self.store.lock().await;
        let message = state
            .messages
            .iter_mut()
            .find(|message| message.id == message_id && message.receiver_id == reader_id)
            .ok_or_else(|| MessageRepositoryError::message_not_found(message_id))?;
        message.is_read = true;
        Ok(message.clone())
    }

    async fn conversation(
        &self,
        user_id: UserId,
        peer_id: UserId,
        limit: usize,
    ) -> Result<Vec<Message>, MessageRepositoryError> {
        let state = self.store.lock().await;
        let thread: Vec<Message> = state
            .messages
            .iter()
            .filter(|message| {
                (message.sender_id == user_id && message.receiver_id == peer_id)
                    || (message.sender_id == peer_id && message.receiver_id == user_id)
            })
            .cloned()
            .collect();
        // Most recent page, still in chronological order.
        let skip = thread.len().saturating_sub(limit);
        Ok(thread.into_iter().skip(skip).collect())
    }
}
