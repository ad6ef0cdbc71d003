//! Reputation ratings and the append-only adjustment ledger.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{ProjectId, UserId};

/// Lowest accepted rating value.
pub const RATING_MIN: i64 = 1;
/// Highest accepted rating value.
pub const RATING_MAX: i64 = 5;

/// Validation error for [`Rating`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingOutOfRange {
    pub value: i64,
}

impl fmt::Display for RatingOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rating must be an integer between {RATING_MIN} and {RATING_MAX}, got {}",
            self.value
        )
    }
}

impl std::error::Error for RatingOutOfRange {}

/// A validated teammate rating in `[1, 5]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    /// Validate and construct a rating.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(value: i64) -> Result<Self, RatingOutOfRange> {
        if (RATING_MIN..=RATING_MAX).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(RatingOutOfRange { value })
        }
    }

    /// Raw rating value.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Signed reputation adjustment this rating applies to the rated user.
    ///
    /// The table is total over the accepted range: 1 is a strong penalty,
    /// 2 and 3 a mild one, 4 and 5 rewards.
    #[must_use]
    pub fn adjustment(self) -> i64 {
        match self.0 {
            1 => -15,
            2 | 3 => -5,
            4 => 5,
            _ => 10,
        }
    }
}

impl From<Rating> for i64 {
    fn from(value: Rating) -> Self {
        Self::from(value.0)
    }
}

impl TryFrom<i64> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Immutable, append-only record of one rating event.
///
/// At most one entry exists per (rater, rated, project) triple; the
/// repository enforces this structurally on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReputationEntry {
    pub rated_user_id: UserId,
    pub rater_id: UserId,
    pub project_id: ProjectId,
    pub rating: Rating,
    pub adjustment: i64,
    pub recorded_at: DateTime<Utc>,
}

/// Informational aggregate over a user's ledger entries. Not used by any
/// cap or threshold logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReputationSummary {
    pub entry_count: usize,
    pub average_adjustment: f64,
}

impl ReputationSummary {
    /// Summarise a chronological slice of ledger entries.
    #[must_use]
    pub fn from_entries(entries: &[ReputationEntry]) -> Self {
        if entries.is_empty() {
            return Self {
                entry_count: 0,
                average_adjustment: 0.0,
            };
        }
        let total: i64 = entries.iter().map(|entry| entry.adjustment).sum();
        #[allow(clippy::cast_precision_loss)]
        let average_adjustment = total as f64 / entries.len() as f64;
        Self {
            entry_count: entries.len(),
            average_adjustment,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(1, -15)]
    #[case(2, -5)]
    #[case(3, -5)]
    #[case(4, 5)]
    #[case(5, 10)]
    fn adjustment_table_is_total(#[case] value: i64, #[case] expected: i64) {
        let rating = Rating::new(value).expect("in-range rating");
        assert_eq!(rating.adjustment(), expected);
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[case(-1)]
    #[case(i64::MAX)]
    fn out_of_range_ratings_are_rejected(#[case] value: i64) {
        assert_eq!(Rating::new(value), Err(RatingOutOfRange { value }));
    }

    fn entry(adjustment: i64) -> ReputationEntry {
        ReputationEntry {
            rated_user_id: UserId::random(),
            rater_id: UserId::random(),
            project_id: ProjectId::random(),
            rating: Rating::new(4).expect("valid rating"),
            adjustment,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn summary_of_empty_ledger_is_zero() {
        let summary = ReputationSummary::from_entries(&[]);
        assert_eq!(summary.entry_count, 0);
        assert!((summary.average_adjustment - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn summary_averages_signed_adjustments() {
        let summary = ReputationSummary::from_entries(&[entry(10), entry(-15), entry(5)]);
        assert_eq!(summary.entry_count, 3);
        assert!((summary.average_adjustment - 0.0).abs() < f64::EPSILON);
    }
}
