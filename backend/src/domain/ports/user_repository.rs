//! Port abstraction for persisting registered users.

use async_trait::async_trait;

use crate::domain::{
    EmailAddress, PasswordHash, PersonName, User, UserId, Username,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another user already holds the username.
        DuplicateUsername => "username already registered",
        /// Another user already holds the email address.
        DuplicateEmail => "email address already registered",
    }
}

/// User row ready for insertion; the password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub first_name: PersonName,
    pub last_name: PersonName,
}

/// Identifier and stored hash looked up during authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user_id: UserId,
    pub password_hash: PasswordHash,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. Unique violations surface as the matching duplicate
    /// variant.
    async fn create(&self, user: &NewUserRecord) -> Result<User, UserPersistenceError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Look up credentials by exact username.
    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    async fn username_taken(&self, username: &Username) -> Result<bool, UserPersistenceError>;

    async fn email_taken(&self, email: &EmailAddress) -> Result<bool, UserPersistenceError>;
}
