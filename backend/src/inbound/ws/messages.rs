//! Wire-level message definitions for the WebSocket adapter.
//!
//! Client frames deserialise into [`ClientMessage`]; domain events and
//! adapter responses serialise out of [`ServerMessage`]. Both use a
//! camelCase `type` tag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Error, ErrorCode, LiveEvent, Message, MessageId, Notification, NotificationId,
    NotificationKind, UserId,
};

/// Inbound frames sent by clients.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Present a token before anything else; every other frame requires an
    /// authenticated connection.
    #[serde(rename_all = "camelCase")]
    Authenticate { token: String },
    #[serde(rename_all = "camelCase")]
    SendMessage { receiver_id: UserId, content: String },
    #[serde(rename_all = "camelCase")]
    MarkAsRead { message_id: MessageId },
    #[serde(rename_all = "camelCase")]
    Typing { receiver_id: UserId },
    #[serde(rename_all = "camelCase")]
    StopTyping { receiver_id: UserId },
    #[serde(rename_all = "camelCase")]
    IsOnline { user_id: UserId },
}

/// Message body as serialised to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    pub id: MessageId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessagePayload {
    fn from(value: Message) -> Self {
        Self {
            id: value.id,
            sender_id: value.sender_id,
            receiver_id: value.receiver_id,
            content: value.content.into(),
            is_read: value.is_read,
            created_at: value.created_at,
        }
    }
}

/// Notification body as serialised to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub id: NotificationId,
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationPayload {
    fn from(value: Notification) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            kind: value.kind,
            title: value.title,
            body: value.body,
            is_read: value.is_read,
            created_at: value.created_at,
        }
    }
}

/// Outbound frames pushed to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    Authenticated { user_id: UserId },
    #[serde(rename_all = "camelCase")]
    UserOnline { user_id: UserId },
    #[serde(rename_all = "camelCase")]
    UserOffline { user_id: UserId },
    #[serde(rename_all = "camelCase")]
    NewMessage { message: MessagePayload },
    /// Acknowledgement to the sender carrying the persisted record.
    #[serde(rename_all = "camelCase")]
    MessageSent { message: MessagePayload },
    #[serde(rename_all = "camelCase")]
    MessageRead { message_id: MessageId, read_by: UserId },
    #[serde(rename_all = "camelCase")]
    UserTyping { user_id: UserId, is_typing: bool },
    #[serde(rename_all = "camelCase")]
    OnlineStatus { user_id: UserId, is_online: bool },
    #[serde(rename_all = "camelCase")]
    NewNotification { notification: NotificationPayload },
    #[serde(rename_all = "camelCase")]
    Error { code: ErrorCode, message: String },
}

impl From<LiveEvent> for ServerMessage {
    fn from(value: LiveEvent) -> Self {
        match value {
            LiveEvent::UserOnline { user_id } => Self::UserOnline { user_id },
            LiveEvent::UserOffline { user_id } => Self::UserOffline { user_id },
            LiveEvent::NewMessage { message } => Self::NewMessage {
                message: message.into(),
            },
            LiveEvent::MessageRead {
                message_id,
                read_by,
            } => Self::MessageRead {
                message_id,
                read_by,
            },
            LiveEvent::UserTyping { user_id, is_typing } => {
                Self::UserTyping { user_id, is_typing }
            }
            LiveEvent::NewNotification { notification } => Self::NewNotification {
                notification: notification.into(),
            },
        }
    }
}

impl From<&Error> for ServerMessage {
    fn from(value: &Error) -> Self {
        Self::Error {
            code: value.code(),
            message: value.message().to_owned(),
        }
    }
}
