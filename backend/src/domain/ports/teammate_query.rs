//! Driving port for teammate recommendations.

use async_trait::async_trait;

use crate::domain::error::DomainResult;
use crate::domain::ids::UserId;
use crate::domain::matching::TeammateSuggestion;

/// Driving port for the ranking engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeammateQuery: Send + Sync {
    /// Ranked teammate suggestions for a user, best match first.
    async fn recommend(&self, user_id: UserId) -> DomainResult<Vec<TeammateSuggestion>>;
}
