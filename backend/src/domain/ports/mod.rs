//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`RecipesQuery`, `RecipesCommand`, `LoginService`,
//! `UserAccounts`) are called by inbound adapters. Driven ports (the
//! `*Repository` traits) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_token_repository;
mod ingredient_repository;
mod login_service;
mod recipe_repository;
mod recipes_command;
mod recipes_query;
mod step_repository;
mod user_accounts;
mod user_repository;

pub use auth_token_repository::{AuthTokenRepository, TokenPersistenceError};
#[cfg(test)]
pub use auth_token_repository::MockAuthTokenRepository;
pub use ingredient_repository::IngredientRepository;
#[cfg(test)]
pub use ingredient_repository::MockIngredientRepository;
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{RecipePersistenceError, RecipeRepository};
#[cfg(test)]
pub use recipes_command::MockRecipesCommand;
pub use recipes_command::{ItemInput, RecipeInput, RecipesCommand, Submitted};
#[cfg(test)]
pub use recipes_query::MockRecipesQuery;
pub use recipes_query::RecipesQuery;
#[cfg(test)]
pub use step_repository::MockStepRepository;
pub use step_repository::StepRepository;
#[cfg(test)]
pub use user_accounts::MockUserAccounts;
pub use user_accounts::{UserAccounts, UserProfile};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{
    NewUserRecord, StoredCredentials, UserPersistenceError, UserRepository,
};
