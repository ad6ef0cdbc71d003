//! Reputation ledger service.
//!
//! Validates ratings, derives the signed adjustment, and hands the
//! repository one draft whose score mutation and log append commit
//! together. Duplicate votes are refused structurally by the repository.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::{DomainResult, Error};
use crate::domain::ids::UserId;
use crate::domain::notification::NotificationKind;
use crate::domain::ports::{
    LiveDelivery, RateTeammateRequest, RatingDraft, ReputationCommand, ReputationRepository,
    ReputationRepositoryError,
};
use crate::domain::reputation::{Rating, ReputationEntry, ReputationSummary};

fn map_repository_error(error: ReputationRepositoryError) -> Error {
    match &error {
        ReputationRepositoryError::DuplicateRating { .. } => Error::conflict(error.to_string()),
        ReputationRepositoryError::UnknownUser { .. } => Error::not_found(error.to_string()),
        ReputationRepositoryError::Storage { .. } => Error::internal(error.to_string()),
    }
}

/// Reputation service implementing the rating driving port.
#[derive(Clone)]
pub struct ReputationService<R> {
    ledger: Arc<R>,
    live: Arc<dyn LiveDelivery>,
}

impl<R> ReputationService<R> {
    /// Create the service over a reputation repository and the delivery hub.
    pub fn new(ledger: Arc<R>, live: Arc<dyn LiveDelivery>) -> Self {
        Self { ledger, live }
    }
}

#[async_trait]
impl<R> ReputationCommand for ReputationService<R>
where
    R: ReputationRepository,
{
    async fn rate(&self, request: RateTeammateRequest) -> DomainResult<ReputationEntry> {
        let rating =
            Rating::new(request.rating).map_err(|err| Error::validation(err.to_string()))?;
        if request.rater_id == request.rated_user_id {
            return Err(Error::validation("users cannot rate themselves"));
        }

        let entry = self
            .ledger
            .record(RatingDraft {
                rater_id: request.rater_id,
                rated_user_id: request.rated_user_id,
                project_id: request.project_id,
                rating,
                adjustment: rating.adjustment(),
            })
            .await
            .map_err(map_repository_error)?;

        self.live
            .notify(
                entry.rated_user_id,
                NotificationKind::ReputationChange,
                "Reputation updated",
                &format!(
                    "A teammate rated you; your reputation changed by {:+}.",
                    entry.adjustment
                ),
            )
            .await;

        Ok(entry)
    }

    async fn history(&self, user_id: UserId) -> DomainResult<Vec<ReputationEntry>> {
        self.ledger
            .history(user_id)
            .await
            .map_err(map_repository_error)
    }

    async fn summary(&self, user_id: UserId) -> DomainResult<ReputationSummary> {
        let entries = self
            .ledger
            .history(user_id)
            .await
            .map_err(map_repository_error)?;
        Ok(ReputationSummary::from_entries(&entries))
    }
}

#[cfg(test)]
#[path = "reputation_service_tests.rs"]
mod tests;
