//! Port abstraction for API token storage.
//!
//! Each user has at most one token. Adapters must make
//! [`AuthTokenRepository::insert_for_user`] tolerate a concurrent insert by
//! returning whichever token ended up stored.

use async_trait::async_trait;

use crate::domain::{AuthToken, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token repository adapters.
    pub enum TokenPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "token repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthTokenRepository: Send + Sync {
    async fn find_for_user(&self, user_id: UserId)
    -> Result<Option<AuthToken>, TokenPersistenceError>;

    /// Store `token` for the user unless one exists, returning the stored token.
    async fn insert_for_user(
        &self,
        user_id: UserId,
        token: &AuthToken,
    ) -> Result<AuthToken, TokenPersistenceError>;

    /// Resolve a presented token to its user.
    async fn find_user(&self, token: &AuthToken) -> Result<Option<UserId>, TokenPersistenceError>;
}
