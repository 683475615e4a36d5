//! Driving port for user registration and profile lookup.

use async_trait::async_trait;

use crate::domain::{Caller, Error, RecipeId, RegistrationInput, User, UserId};

/// A user together with the recipe they own, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user: User,
    pub recipe: Option<RecipeId>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Validate and store a new user. Field errors are reported together.
    async fn register(&self, input: RegistrationInput) -> Result<UserProfile, Error>;

    /// Fetch a user. Only the user themself may do so.
    async fn get_user(&self, caller: Caller, id: UserId) -> Result<UserProfile, Error>;
}
