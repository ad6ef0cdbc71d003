//! Port onto the external identity collaborator.
//!
//! The core never mints or validates credentials itself; it hands the raw
//! token to this port and receives a user identity or a rejection.

use async_trait::async_trait;

use crate::domain::ids::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token verification adapters.
    pub enum VerifyTokenError {
        /// The token is unknown or malformed.
        InvalidToken => "token is not recognised",
        /// The token was valid once but has expired.
        Expired => "token has expired",
        /// The verifier itself failed.
        Verification { message: String } =>
            "token verification failed: {message}",
    }
}

/// Port for resolving a connection token to a user identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify a token and return the authenticated user.
    async fn verify(&self, token: &str) -> Result<UserId, VerifyTokenError>;
}
