//! Per-user collaboration aggregate.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::ids::{DomainId, SkillId, UserId};

/// Reputation score newly registered collaborators start from.
pub const INITIAL_REPUTATION: i64 = 100;

/// Snapshot of the per-user collaboration state the core keeps consistent.
///
/// ## Invariants
/// - `reputation_score` never drops below zero.
/// - `active_project_count` equals the number of memberships the user holds
///   in projects whose status is Active. Only the project repository mutates
///   it, and only together with the membership change that justifies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaboratorProfile {
    pub user_id: UserId,
    pub reputation_score: i64,
    pub active_project_count: u32,
    pub is_available: bool,
    pub skills: BTreeSet<SkillId>,
    pub domains: BTreeSet<DomainId>,
}

impl CollaboratorProfile {
    /// Create a fresh profile with the starting reputation, no active
    /// projects, and availability switched on.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            reputation_score: INITIAL_REPUTATION,
            active_project_count: 0,
            is_available: true,
            skills: BTreeSet::new(),
            domains: BTreeSet::new(),
        }
    }

    /// Replace the skill set.
    #[must_use]
    pub fn with_skills(mut self, skills: impl IntoIterator<Item = SkillId>) -> Self {
        self.skills = skills.into_iter().collect();
        self
    }

    /// Replace the domain set.
    #[must_use]
    pub fn with_domains(mut self, domains: impl IntoIterator<Item = DomainId>) -> Self {
        self.domains = domains.into_iter().collect();
        self
    }

    /// Override the reputation score (clamped at the zero floor).
    #[must_use]
    pub fn with_reputation(mut self, score: i64) -> Self {
        self.reputation_score = score.max(0);
        self
    }

    /// Override availability.
    #[must_use]
    pub fn with_availability(mut self, is_available: bool) -> Self {
        self.is_available = is_available;
        self
    }

    /// Apply a signed reputation adjustment, clamping at the zero floor.
    /// Returns the score after the adjustment.
    pub fn apply_adjustment(&mut self, adjustment: i64) -> i64 {
        self.reputation_score = (self.reputation_score + adjustment).max(0);
        self.reputation_score
    }
}
