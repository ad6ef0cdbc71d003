//! Tests for the reputation ledger service.

use std::sync::Arc;

use chrono::Utc;
use rstest::rstest;

use super::*;
use crate::domain::error::ErrorCode;
use crate::domain::ids::ProjectId;
use crate::domain::ports::{MockLiveDelivery, MockReputationRepository};

fn entry_for(draft: RatingDraft) -> ReputationEntry {
    ReputationEntry {
        rated_user_id: draft.rated_user_id,
        rater_id: draft.rater_id,
        project_id: draft.project_id,
        rating: draft.rating,
        adjustment: draft.adjustment,
        recorded_at: Utc::now(),
    }
}

fn quiet_delivery() -> Arc<dyn LiveDelivery> {
    let mut live = MockLiveDelivery::new();
    live.expect_notify().return_const(());
    Arc::new(live)
}

fn request(rating: i64) -> RateTeammateRequest {
    RateTeammateRequest {
        rater_id: UserId::random(),
        rated_user_id: UserId::random(),
        project_id: ProjectId::random(),
        rating,
    }
}

#[rstest]
#[case(0)]
#[case(6)]
#[case(-3)]
#[tokio::test]
async fn out_of_range_ratings_never_reach_the_ledger(#[case] rating: i64) {
    let mut ledger = MockReputationRepository::new();
    ledger.expect_record().times(0);

    let service = ReputationService::new(Arc::new(ledger), quiet_delivery());
    let error = service.rate(request(rating)).await.expect_err("bad rating");

    assert_eq!(error.code(), ErrorCode::Validation);
}

#[tokio::test]
async fn self_ratings_are_rejected() {
    let mut ledger = MockReputationRepository::new();
    ledger.expect_record().times(0);

    let user_id = UserId::random();
    let service = ReputationService::new(Arc::new(ledger), quiet_delivery());
    let error = service
        .rate(RateTeammateRequest {
            rater_id: user_id,
            rated_user_id: user_id,
            project_id: ProjectId::random(),
            rating: 5,
        })
        .await
        .expect_err("self rating");

    assert_eq!(error.code(), ErrorCode::Validation);
}

#[rstest]
#[case(1, -15)]
#[case(3, -5)]
#[case(4, 5)]
#[case(5, 10)]
#[tokio::test]
async fn rate_derives_the_adjustment_from_the_table(
    #[case] rating: i64,
    #[case] expected_adjustment: i64,
) {
    let mut ledger = MockReputationRepository::new();
    ledger
        .expect_record()
        .times(1)
        .withf(move |draft| draft.adjustment == expected_adjustment)
        .returning(|draft| Ok(entry_for(draft)));

    let service = ReputationService::new(Arc::new(ledger), quiet_delivery());
    let entry = service.rate(request(rating)).await.expect("rate succeeds");

    assert_eq!(entry.adjustment, expected_adjustment);
}

#[tokio::test]
async fn rate_notifies_the_rated_user() {
    let rate_request = request(5);
    let rated_user_id = rate_request.rated_user_id;

    let mut ledger = MockReputationRepository::new();
    ledger
        .expect_record()
        .times(1)
        .returning(|draft| Ok(entry_for(draft)));

    let mut live = MockLiveDelivery::new();
    live.expect_notify()
        .times(1)
        .withf(move |user_id, kind, _title, _body| {
            *user_id == rated_user_id && *kind == NotificationKind::ReputationChange
        })
        .return_const(());

    let service = ReputationService::new(Arc::new(ledger), Arc::new(live));
    service.rate(rate_request).await.expect("rate succeeds");
}

#[tokio::test]
async fn duplicate_votes_surface_as_conflicts() {
    let rate_request = request(4);
    let mut ledger = MockReputationRepository::new();
    ledger.expect_record().times(1).return_once(move |draft| {
        Err(ReputationRepositoryError::duplicate_rating(
            draft.rater_id,
            draft.rated_user_id,
            draft.project_id,
        ))
    });

    let mut live = MockLiveDelivery::new();
    live.expect_notify().times(0);

    let service = ReputationService::new(Arc::new(ledger), Arc::new(live));
    let error = service
        .rate(rate_request)
        .await
        .expect_err("duplicate vote");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn summary_averages_the_ledger() {
    let user_id = UserId::random();
    let entries: Vec<ReputationEntry> = [10, -15, 5]
        .into_iter()
        .map(|adjustment| {
            entry_for(RatingDraft {
                rater_id: UserId::random(),
                rated_user_id: user_id,
                project_id: ProjectId::random(),
                rating: Rating::new(4).expect("valid rating"),
                adjustment,
            })
        })
        .collect();

    let mut ledger = MockReputationRepository::new();
    ledger
        .expect_history()
        .times(1)
        .return_once(move |_| Ok(entries));

    let service = ReputationService::new(Arc::new(ledger), quiet_delivery());
    let summary = service.summary(user_id).await.expect("summary succeeds");

    assert_eq!(summary.entry_count, 3);
    assert!((summary.average_adjustment - 0.0).abs() < f64::EPSILON);
}
