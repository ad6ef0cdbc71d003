//! Port for the reputation ledger.
//!
//! The duplicate guard is structural: `record` must reject a second entry
//! for the same (rater, rated, project) triple in the same indivisible step
//! that would otherwise insert it, and the score mutation commits together
//! with the log append.

use async_trait::async_trait;

use crate::domain::ids::{ProjectId, UserId};
use crate::domain::reputation::{Rating, ReputationEntry};

use super::define_port_error;

define_port_error! {
    /// Errors raised by reputation repository adapters.
    pub enum ReputationRepositoryError {
        /// The rater already rated this user for this project.
        DuplicateRating { rater_id: UserId, rated_user_id: UserId, project_id: ProjectId } =>
            "user {rater_id} already rated {rated_user_id} for project {project_id}",
        /// The user has no registered profile.
        UnknownUser { user_id: UserId } =>
            "user {user_id} is not registered",
        /// The underlying store failed.
        Storage { message: String } =>
            "reputation store failure: {message}",
    }
}

/// Input for recording one rating event. The adjustment is precomputed by
/// the service from the rating so the ledger entry carries the signed value
/// that was actually applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingDraft {
    pub rater_id: UserId,
    pub rated_user_id: UserId,
    pub project_id: ProjectId,
    pub rating: Rating,
    pub adjustment: i64,
}

/// Port for recording and reading reputation events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReputationRepository: Send + Sync {
    /// Apply the adjustment to the rated user's score (clamped at the zero
    /// floor) and append the ledger entry as one unit. Rejects duplicates
    /// for the (rater, rated, project) triple.
    async fn record(&self, draft: RatingDraft)
        -> Result<ReputationEntry, ReputationRepositoryError>;

    /// Chronological ledger entries for a user.
    async fn history(&self, user_id: UserId)
        -> Result<Vec<ReputationEntry>, ReputationRepositoryError>;
}
