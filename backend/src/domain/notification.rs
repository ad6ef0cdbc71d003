//! Persisted notifications delivered asynchronously to users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{NotificationId, UserId};

/// Category of a stored notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A direct message arrived while the receiver may have been offline.
    NewMessage,
    /// Project membership changed (join, leave, completion).
    ProjectUpdate,
    /// The user's reputation score was adjusted.
    ReputationChange,
}

/// A stored notification. Only the read flag is mutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn kind_serialises_snake_case() {
        assert_eq!(
            serde_json::to_value(NotificationKind::NewMessage).expect("serialise"),
            json!("new_message")
        );
        assert_eq!(
            serde_json::to_value(NotificationKind::ReputationChange).expect("serialise"),
            json!("reputation_change")
        );
    }
}
