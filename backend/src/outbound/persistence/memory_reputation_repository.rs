//! Reputation ledger over the shared in-process store.
//!
//! The duplicate check, the score mutation, and the log append happen in
//! one critical section, so a rating is either fully recorded or not
//! recorded at all.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{RatingDraft, ReputationRepository, ReputationRepositoryError};
use crate::domain::{ReputationEntry, UserId};

use super::store::CollaborationStore;

/// In-process implementation of the reputation repository port.
#[derive(Debug, Clone)]
pub struct MemoryReputationRepository {
    store: CollaborationStore,
}

impl MemoryReputationRepository {
    /// Create the repository over a shared store.
    #[must_use]
    pub fn new(store: CollaborationStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ReputationRepository for MemoryReputationRepository {
    async fn record(
        &self,
        draft: RatingDraft,
    ) -> Result<ReputationEntry, ReputationRepositoryError> {
        let mut state = self.store.lock().await;

        let key = (draft.rater_id, draft.rated_user_id, draft.project_id);
        if state.rating_keys.contains(&key) {
            return Err(ReputationRepositoryError::duplicate_rating(
                draft.rater_id,
                draft.rated_user_id,
                draft.project_id,
            ));
        }
        if !state.profiles.contains_key(&draft.rater_id) {
            return Err(ReputationRepositoryError::unknown_user(draft.rater_id));
        }
        let rated = state
            .profiles
            .get_mut(&draft.rated_user_id)
            .ok_or_else(|| ReputationRepositoryError::unknown_user(draft.rated_user_id))?;

        rated.apply_adjustment(draft.adjustment);
        let entry = ReputationEntry {
            rated_user_id: draft.rated_user_id,
            rater_id: draft.rater_id,
            project_id: draft.project_id,
            rating: draft.rating,
            adjustment: draft.adjustment,
            recorded_at: Utc::now(),
        };
        state.rating_keys.insert(key);
        state.reputation_log.push(entry.clone());

        Ok(entry)
    }

    async fn history(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ReputationEntry>, ReputationRepositoryError> {
        let state = self.store.lock().await;
        Ok(state
            .reputation_log
            .iter()
            .filter(|entry| entry.rated_user_id == user_id)
            .cloned()
            .collect())
    }
}
