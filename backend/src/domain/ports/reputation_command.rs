//! Driving port for the reputation ledger.

use async_trait::async_trait;

use crate::domain::error::DomainResult;
use crate::domain::ids::{ProjectId, UserId};
use crate::domain::reputation::{ReputationEntry, ReputationSummary};

/// Request to rate a teammate. The rating arrives unvalidated from the
/// transport layer; the service enforces the `[1, 5]` range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateTeammateRequest {
    pub rater_id: UserId,
    pub rated_user_id: UserId,
    pub project_id: ProjectId,
    pub rating: i64,
}

/// Driving port for rating teammates and reading the ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReputationCommand: Send + Sync {
    /// Record one rating event, adjusting the rated user's score.
    async fn rate(&self, request: RateTeammateRequest) -> DomainResult<ReputationEntry>;

    /// Chronological ledger entries for a user.
    async fn history(&self, user_id: UserId) -> DomainResult<Vec<ReputationEntry>>;

    /// Informational average-adjustment summary for a user.
    async fn summary(&self, user_id: UserId) -> DomainResult<ReputationSummary>;
}
