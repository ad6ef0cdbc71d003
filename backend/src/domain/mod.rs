//! Domain model and services for the collaboration core.
//!
//! Value types and aggregates live in their own modules; services implement
//! the driving ports from [`ports`] over the driven ports the adapters
//! provide. Nothing in this tree knows about transports or storage engines.

pub mod error;
pub mod events;
pub mod ids;
pub mod matching;
pub mod matching_service;
pub mod membership_service;
pub mod message;
pub mod messaging_service;
pub mod notification;
pub mod notification_service;
pub mod ports;
pub mod profile;
pub mod project;
pub mod reputation;
pub mod reputation_service;

pub use self::error::{DomainResult, Error, ErrorCode};
pub use self::events::LiveEvent;
pub use self::ids::{DomainId, MessageId, NotificationId, ProjectId, SkillId, UserId};
pub use self::matching::TeammateSuggestion;
pub use self::matching_service::MatchingService;
pub use self::membership_service::MembershipService;
pub use self::message::{Message, MessageContent, MessageContentError};
pub use self::messaging_service::MessagingService;
pub use self::notification::{Notification, NotificationKind};
pub use self::notification_service::NotificationService;
pub use self::profile::CollaboratorProfile;
pub use self::project::{
    MembershipRole, Project, ProjectMembership, ProjectName, ProjectRoster, ProjectStatus,
    MAX_ACTIVE_PROJECTS,
};
pub use self::reputation::{Rating, ReputationEntry, ReputationSummary};
pub use self::reputation_service::ReputationService;
