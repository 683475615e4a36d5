//! Port abstraction for recipe persistence.
//!
//! Recipes are listed in their natural order: by name, ties broken by id.
//! Deleting a recipe removes its ingredients and steps in the same
//! operation.

use async_trait::async_trait;

use crate::domain::{Recipe, RecipeFilter, RecipeId, RecipeName, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe, ingredient and step repository adapters.
    pub enum RecipePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "recipe repository query failed: {message}",
        /// The owner already has a recipe.
        DuplicateOwner => "owner already has a recipe",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Recipes satisfying every clause of `filter`, in natural order.
    async fn list(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>, RecipePersistenceError>;

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, RecipePersistenceError>;

    async fn find_by_owner(&self, owner: UserId)
    -> Result<Option<Recipe>, RecipePersistenceError>;

    /// Insert a recipe. A second recipe for `owner` is
    /// [`RecipePersistenceError::DuplicateOwner`].
    async fn create(
        &self,
        owner: UserId,
        name: &RecipeName,
    ) -> Result<Recipe, RecipePersistenceError>;

    /// Replace the name. `None` when the recipe no longer exists.
    async fn rename(
        &self,
        id: RecipeId,
        name: &RecipeName,
    ) -> Result<Option<Recipe>, RecipePersistenceError>;

    /// Remove the recipe and its children. `false` when nothing was removed.
    async fn delete(&self, id: RecipeId) -> Result<bool, RecipePersistenceError>;
}
