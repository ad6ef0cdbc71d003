//! Teammate recommendation service.
//!
//! A read-only consumer of the same aggregates the write paths maintain.
//! All scoring lives in [`crate::domain::matching`]; this service only
//! fetches the inputs through the directory port.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::{DomainResult, Error};
use crate::domain::ids::UserId;
use crate::domain::matching::{
    rank_candidates, TeammateSuggestion, CANDIDATE_POOL_LIMIT, MIN_CANDIDATE_REPUTATION,
};
use crate::domain::ports::{CandidateDirectory, DirectoryError, TeammateQuery};

fn map_directory_error(error: DirectoryError) -> Error {
    match &error {
        DirectoryError::UnknownUser { .. } => Error::not_found(error.to_string()),
        DirectoryError::Lookup { .. } => Error::internal(error.to_string()),
    }
}

/// Matching service implementing the recommendation driving port.
#[derive(Clone)]
pub struct MatchingService<D> {
    directory: Arc<D>,
}

impl<D> MatchingService<D> {
    /// Create the service over a candidate directory.
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl<D> TeammateQuery for MatchingService<D>
where
    D: CandidateDirectory,
{
    async fn recommend(&self, user_id: UserId) -> DomainResult<Vec<TeammateSuggestion>> {
        let skills = self
            .directory
            .skill_set(user_id)
            .await
            .map_err(map_directory_error)?;
        let domains = self
            .directory
            .domain_set(user_id)
            .await
            .map_err(map_directory_error)?;
        let pool = self
            .directory
            .candidate_pool(user_id, MIN_CANDIDATE_REPUTATION, CANDIDATE_POOL_LIMIT)
            .await
            .map_err(map_directory_error)?;

        Ok(rank_candidates(&skills, &domains, &pool))
    }
}

#[cfg(test)]
#[path = "matching_service_tests.rs"]
mod tests;
