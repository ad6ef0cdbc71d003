//! Domain events pushed to live connections.
//!
//! These are transport agnostic; the WebSocket adapter converts them into
//! wire payloads before serialisation. Delivery is best-effort and
//! at-most-once: events for offline users are dropped, with a persisted
//! [`Notification`](crate::domain::Notification) as the durable fallback
//! where one is warranted.

use crate::domain::ids::{MessageId, UserId};
use crate::domain::message::Message;
use crate::domain::notification::Notification;

/// An event destined for one live connection (or all of them, when
/// broadcast by the presence hub).
#[derive(Debug, Clone, PartialEq)]
pub enum LiveEvent {
    /// A user's connection was registered.
    UserOnline { user_id: UserId },
    /// A user's connection was removed.
    UserOffline { user_id: UserId },
    /// A direct message addressed to the receiving connection's user.
    NewMessage { message: Message },
    /// Read receipt for a message the receiving connection's user sent.
    MessageRead { message_id: MessageId, read_by: UserId },
    /// Ephemeral typing indicator; never persisted.
    UserTyping { user_id: UserId, is_typing: bool },
    /// A notification row was stored for the receiving connection's user.
    NewNotification { notification: Notification },
}
