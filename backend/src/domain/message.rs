//! Direct messages between platform users.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{MessageId, UserId};

/// Maximum message length, in characters, after trimming.
pub const MESSAGE_CONTENT_MAX: usize = 4000;

/// Validation errors for [`MessageContent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContentError {
    Empty,
    TooLong { max: usize },
}

impl fmt::Display for MessageContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "message content must not be empty"),
            Self::TooLong { max } => {
                write!(f, "message content must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for MessageContentError {}

/// Validated, trimmed message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageContent(String);

impl MessageContent {
    /// Validate and construct message content. Surrounding whitespace is
    /// stripped first; blank-after-trim input is rejected.
    pub fn new(content: impl Into<String>) -> Result<Self, MessageContentError> {
        let trimmed = content.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(MessageContentError::Empty);
        }
        if trimmed.chars().count() > MESSAGE_CONTENT_MAX {
            return Err(MessageContentError::TooLong {
                max: MESSAGE_CONTENT_MAX,
            });
        }
        Ok(Self(trimmed))
    }
}

impl AsRef<str> for MessageContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MessageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<MessageContent> for String {
    fn from(value: MessageContent) -> Self {
        value.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = MessageContentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A persisted direct message. Immutable once created except for the read
/// flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: MessageContent,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
