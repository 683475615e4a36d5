//! Driving port for login/authentication use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials or tokens without knowing the backing
//! infrastructure, so handler tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{AuthToken, Error, LoginCredentials, UserId};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;

    /// Exchange credentials for the user's API token, creating it on first
    /// use.
    async fn obtain_token(&self, credentials: &LoginCredentials) -> Result<AuthToken, Error>;

    /// Resolve a presented token. Unknown tokens are unauthorised.
    async fn resolve_token(&self, token: &AuthToken) -> Result<UserId, Error>;
}
