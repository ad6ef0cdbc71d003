//! Read port onto the externally owned user/skill/domain data.
//!
//! The ranking engine is a read-only consumer: it must always observe
//! committed aggregate values, never partially applied ones. Adapters back
//! this with the same store the write paths commit to.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::ids::{DomainId, SkillId, UserId};
use crate::domain::profile::CollaboratorProfile;

use super::define_port_error;

define_port_error! {
    /// Errors raised by candidate directory adapters.
    pub enum DirectoryError {
        /// The user has no registered profile.
        UnknownUser { user_id: UserId } =>
            "user {user_id} is not registered",
        /// The lookup failed in the underlying store.
        Lookup { message: String } =>
            "directory lookup failed: {message}",
    }
}

/// Port for candidate and skill/domain reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CandidateDirectory: Send + Sync {
    /// The user's skill-id set.
    async fn skill_set(&self, user_id: UserId) -> Result<BTreeSet<SkillId>, DirectoryError>;

    /// The user's domain-id set.
    async fn domain_set(&self, user_id: UserId) -> Result<BTreeSet<DomainId>, DirectoryError>;

    /// Available users with at least `min_reputation`, excluding
    /// `exclude`, ordered by reputation descending then arrival order, and
    /// truncated to `limit`.
    async fn candidate_pool(
        &self,
        exclude: UserId,
        min_reputation: i64,
        limit: usize,
    ) -> Result<Vec<CollaboratorProfile>, DirectoryError>;
}
