//! Strongly typed identifiers shared across the domain.
//!
//! Every aggregate gets its own UUID newtype so that a project id can never
//! be passed where a user id is expected. Identifiers serialise as plain
//! UUID strings.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(value: Uuid) -> Self {
                Self(value)
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }
    };
}

define_id! {
    /// Identity of a platform user.
    UserId
}

define_id! {
    /// Identity of a collaboration project.
    ProjectId
}

define_id! {
    /// Identity of a direct message.
    MessageId
}

define_id! {
    /// Identity of a stored notification.
    NotificationId
}

define_id! {
    /// Identity of a skill tag owned by the profile collaborator.
    SkillId
}

define_id! {
    /// Identity of a domain (industry/field) tag.
    DomainId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialises_as_plain_uuid_string() {
        let id = UserId::from_uuid(Uuid::nil());
        let json = serde_json::to_string(&id).expect("serialise id");
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");
    }

    #[test]
    fn round_trips_through_serde() {
        let id = ProjectId::random();
        let json = serde_json::to_string(&id).expect("serialise id");
        let back: ProjectId = serde_json::from_str(&json).expect("deserialise id");
        assert_eq!(id, back);
    }

    #[test]
    fn display_matches_uuid_formatting() {
        let raw = Uuid::new_v4();
        assert_eq!(MessageId::from_uuid(raw).to_string(), raw.to_string());
    }
}
