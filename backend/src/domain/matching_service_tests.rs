//! Tests for the teammate recommendation service.

use std::collections::BTreeSet;
use std::sync::Arc;

use uuid::Uuid;

use super::*;
use crate::domain::error::ErrorCode;
use crate::domain::ids::SkillId;
use crate::domain::ports::MockCandidateDirectory;
use crate::domain::profile::CollaboratorProfile;

fn skill_set(ids: &[u128]) -> BTreeSet<SkillId> {
    ids.iter()
        .map(|id| SkillId::from_uuid(Uuid::from_u128(*id)))
        .collect()
}

fn candidate(reputation: i64, skill_ids: &[u128]) -> CollaboratorProfile {
    let mut profile = CollaboratorProfile::new(UserId::random()).with_reputation(reputation);
    profile.skills = skill_set(skill_ids);
    profile
}

#[tokio::test]
async fn recommend_queries_the_pool_with_the_configured_bounds() {
    let requester_id = UserId::random();

    let mut directory = MockCandidateDirectory::new();
    directory
        .expect_skill_set()
        .times(1)
        .return_once(|_| Ok(skill_set(&[1, 2])));
    directory
        .expect_domain_set()
        .times(1)
        .return_once(|_| Ok(BTreeSet::new()));
    directory
        .expect_candidate_pool()
        .times(1)
        .withf(move |exclude, min_reputation, limit| {
            *exclude == requester_id
                && *min_reputation == MIN_CANDIDATE_REPUTATION
                && *limit == CANDIDATE_POOL_LIMIT
        })
        .return_once(|_, _, _| Ok(vec![candidate(90, &[1, 2])]));

    let service = MatchingService::new(Arc::new(directory));
    let suggestions = service
        .recommend(requester_id)
        .await
        .expect("recommendation succeeds");

    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].skill_match, 100);
}

#[tokio::test]
async fn recommend_maps_unknown_users_to_not_found() {
    let requester_id = UserId::random();

    let mut directory = MockCandidateDirectory::new();
    directory
        .expect_skill_set()
        .times(1)
        .return_once(move |_| Err(DirectoryError::unknown_user(requester_id)));

    let service = MatchingService::new(Arc::new(directory));
    let error = service
        .recommend(requester_id)
        .await
        .expect_err("unknown requester");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn recommend_orders_by_ranking_score() {
    let requester_id = UserId::random();
    let strong_match = candidate(80, &[1, 2, 3]);
    let weak_match = candidate(80, &[9]);
    let strong_id = strong_match.user_id;
    let pool = vec![weak_match, strong_match];

    let mut directory = MockCandidateDirectory::new();
    directory
        .expect_skill_set()
        .return_once(|_| Ok(skill_set(&[1, 2, 3])));
    directory
        .expect_domain_set()
        .return_once(|_| Ok(BTreeSet::new()));
    directory
        .expect_candidate_pool()
        .return_once(move |_, _, _| Ok(pool));

    let service = MatchingService::new(Arc::new(directory));
    let suggestions = service
        .recommend(requester_id)
        .await
        .expect("recommendation succeeds");

    assert_eq!(suggestions[0].user_id, strong_id);
}
