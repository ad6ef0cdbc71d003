//! Teammate ranking: a fixed, explainable scoring formula.
//!
//! Scoring is pure: identical profile snapshots and skill/domain sets always
//! produce the identical ordered output. The candidate pool the directory
//! hands us is already bounded (top reputation first), so ranking cost is
//! capped; this is a documented approximation, not a guarantee of global
//! optimality.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::ids::{DomainId, SkillId, UserId};
use crate::domain::profile::CollaboratorProfile;

/// Candidates below this reputation score are not suggested.
pub const MIN_CANDIDATE_REPUTATION: i64 = 70;
/// Upper bound on the candidate pool fetched for one recommendation.
pub const CANDIDATE_POOL_LIMIT: usize = 100;
/// Maximum number of suggestions returned to the requester.
pub const MAX_SUGGESTIONS: usize = 20;

/// Activity score lost per concurrently active project.
const ACTIVITY_PENALTY_PER_PROJECT: u32 = 40;

const REPUTATION_WEIGHT: f64 = 0.5;
const SKILL_WEIGHT: f64 = 0.3;
const ACTIVITY_WEIGHT: f64 = 0.2;

/// One ranked teammate suggestion with the inputs that produced its score,
/// so the caller can explain the ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeammateSuggestion {
    pub user_id: UserId,
    pub reputation_score: i64,
    /// Jaccard similarity of skill sets, as an integer percentage.
    pub skill_match: u8,
    /// Jaccard similarity of domain sets; display-only, not part of the
    /// ranking score.
    pub domain_match: u8,
    pub recent_activity: u8,
    pub ranking_score: f64,
}

/// Jaccard similarity of two sets as an integer percentage, rounded to the
/// nearest whole percent. Two empty sets score 0, not 100.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn overlap_percent<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> u8 {
    let union = a.union(b).count();
    if union == 0 {
        return 0;
    }
    let intersection = a.intersection(b).count();
    (100.0 * intersection as f64 / union as f64).round() as u8
}

/// Availability heuristic: a free user scores 100, each active project
/// costs 40 points, floored at 0.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn recent_activity(active_project_count: u32) -> u8 {
    let score = 100u32.saturating_sub(
        ACTIVITY_PENALTY_PER_PROJECT.saturating_mul(active_project_count),
    );
    score as u8
}

/// Weighted ranking score, rounded to one decimal place.
#[must_use]
pub fn ranking_score(reputation_score: i64, skill_match: u8, recent_activity: u8) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let raw = REPUTATION_WEIGHT * reputation_score as f64
        + SKILL_WEIGHT * f64::from(skill_match)
        + ACTIVITY_WEIGHT * f64::from(recent_activity);
    (raw * 10.0).round() / 10.0
}

/// Score and order a candidate pool for a requester.
///
/// The sort is stable and descending by ranking score, so ties keep the
/// pool's pre-existing order (reputation descending, then arrival order).
#[must_use]
pub fn rank_candidates(
    requester_skills: &BTreeSet<SkillId>,
    requester_domains: &BTreeSet<DomainId>,
    pool: &[CollaboratorProfile],
) -> Vec<TeammateSuggestion> {
    let mut suggestions: Vec<TeammateSuggestion> = pool
        .iter()
        .map(|candidate| {
            let skill_match = overlap_percent(requester_skills, &candidate.skills);
            let domain_match = overlap_percent(requester_domains, &candidate.domains);
            let recent_activity = recent_activity(candidate.active_project_count);
            TeammateSuggestion {
                user_id: candidate.user_id,
                reputation_score: candidate.reputation_score,
                skill_match,
                domain_match,
                recent_activity,
                ranking_score: ranking_score(
                    candidate.reputation_score,
                    skill_match,
                    recent_activity,
                ),
            }
        })
        .collect();
    suggestions.sort_by(|a, b| b.ranking_score.total_cmp(&a.ranking_score));
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}
