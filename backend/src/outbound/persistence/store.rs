//! In-process transactional store shared by the memory adapters.
//!
//! All durable aggregates live behind one async mutex. Every repository
//! operation is a single critical section with no await points inside, so
//! the check-then-act sequences the domain depends on (cap
//! check-and-increment, duplicate-rating unique insert, multi-member
//! completion decrement) are indivisible by construction. A SQL adapter
//! replacing this one must provide the same guarantees through
//! conditional updates and transactions.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::domain::{
    CollaboratorProfile, Message, Notification, Project, ProjectId, ProjectMembership,
    ReputationEntry, UserId,
};

/// Mutable store contents; only reachable through the mutex.
#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub(crate) profiles: HashMap<UserId, CollaboratorProfile>,
    /// Registration order, the tie-break after reputation in pool queries.
    pub(crate) arrival: Vec<UserId>,
    pub(crate) projects: HashMap<ProjectId, Project>,
    pub(crate) memberships: Vec<ProjectMembership>,
    /// Append-only rating ledger in arrival order.
    pub(crate) reputation_log: Vec<ReputationEntry>,
    /// Structural uniqueness index over (rater, rated, project).
    pub(crate) rating_keys: HashSet<(UserId, UserId, ProjectId)>,
    pub(crate) messages: Vec<Message>,
    pub(crate) notifications: Vec<Notification>,
}

/// Handle to the shared store; clones refer to the same state.
#[derive(Debug, Clone, Default)]
pub struct CollaborationStore {
    state: Arc<Mutex<StoreState>>,
}

impl CollaborationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().await
    }

    /// Insert or replace a collaborator profile. The external profile
    /// layer owns this data; the core only mutates it through repository
    /// operations.
    pub async fn upsert_profile(&self, profile: CollaboratorProfile) {
        let mut state = self.lock().await;
        let user_id = profile.user_id;
        if state.profiles.insert(user_id, profile).is_none() {
            state.arrival.push(user_id);
        }
    }

    /// Read a collaborator profile snapshot.
    pub async fn profile(&self, user_id: UserId) -> Option<CollaboratorProfile> {
        self.lock().await.profiles.get(&user_id).cloned()
    }

    /// Memberships a user currently holds in Active projects. Diagnostic
    /// counterpart of the `active_project_count` invariant.
    pub async fn active_memberships(&self, user_id: UserId) -> usize {
        let state = self.lock().await;
        state
            .memberships
            .iter()
            .filter(|membership| {
                membership.user_id == user_id
                    && state
                        .projects
                        .get(&membership.project_id)
                        .is_some_and(|project| project.status.is_active())
            })
            .count()
    }
}
