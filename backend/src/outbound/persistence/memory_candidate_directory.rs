//! Candidate directory over the shared in-process store.
//!
//! Reads go through the same mutex the write paths commit under, so the
//! ranking engine only ever observes committed aggregate values.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::ports::{CandidateDirectory, DirectoryError};
use crate::domain::{CollaboratorProfile, DomainId, SkillId, UserId};

use super::store::CollaborationStore;

/// In-process implementation of the candidate directory port.
#[derive(Debug, Clone)]
pub struct MemoryCandidateDirectory {
    store: CollaborationStore,
}

impl MemoryCandidateDirectory {
    /// Create the directory over a shared store.
    #[must_use]
    pub fn new(store: CollaborationStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CandidateDirectory for MemoryCandidateDirectory {
    async fn skill_set(&self, user_id: UserId) -> Result<BTreeSet<SkillId>, DirectoryError> {
        let state = self.store.lock().await;
        state
            .profiles
            .get(&user_id)
            .map(|profile| profile.skills.clone())
            .ok_or_else(|| DirectoryError::unknown_user(user_id))
    }

    async fn domain_set(&self, user_id: UserId) -> Result<BTreeSet<DomainId>, DirectoryError> {
        let state = self.store.lock().await;
        state
            .profiles
            .get(&user_id)
            .map(|profile| profile.domains.clone())
            .ok_or_else(|| DirectoryError::unknown_user(user_id))
    }

    async fn candidate_pool(
        &self,
        exclude: UserId,
        min_reputation: i64,
        limit: usize,
    ) -> Result<Vec<CollaboratorProfile>, DirectoryError> {
        let state = self.store.lock().await;
        // Arrival order is the tie-break, so iterate registrations and let
        // the stable sort regroup by reputation.
        let mut pool: Vec<CollaboratorProfile> = state
            .arrival
            .iter()
            .filter(|user_id| **user_id != exclude)
            .filter_map(|user_id| state.profiles.get(user_id))
            .filter(|profile| profile.is_available && profile.reputation_score >= min_reputation)
            .cloned()
            .collect();
        pool.sort_by(|a, b| b.reputation_score.cmp(&a.reputation_score));
        pool.truncate(limit);
        Ok(pool)
    }
}
