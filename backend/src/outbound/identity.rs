//! Token verification adapter.
//!
//! Credential issuance is external; this adapter resolves opaque session
//! tokens the identity layer registered. Tokens live in a sharded map so
//! verification never contends across connections.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::ports::{TokenVerifier, VerifyTokenError};
use crate::domain::UserId;

/// Verifier over tokens registered in-process by the identity layer.
#[derive(Debug, Default)]
pub struct SharedTokenVerifier {
    tokens: DashMap<String, UserId>,
}

impl SharedTokenVerifier {
    /// Create an empty verifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token for a user. Called by the identity layer when it
    /// issues a session.
    pub fn register_token(&self, token: impl Into<String>, user_id: UserId) {
        self.tokens.insert(token.into(), user_id);
    }

    /// Drop a token, e.g. on logout. Subsequent verifications fail.
    pub fn revoke_token(&self, token: &str) {
        self.tokens.remove(token);
    }
}

#[async_trait]
impl TokenVerifier for SharedTokenVerifier {
    async fn verify(&self, token: &str) -> Result<UserId, VerifyTokenError> {
        self.tokens
            .get(token)
            .map(|entry| *entry.value())
            .ok_or_else(VerifyTokenError::invalid_token)
    }
}
