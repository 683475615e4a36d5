//! Port abstraction for ingredient persistence.
//!
//! Ingredients are listed per recipe in insertion order.

use async_trait::async_trait;

use crate::domain::{Ingredient, IngredientId, ItemText, RecipeId, RecipeRef};

use super::RecipePersistenceError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    async fn list_for_recipe(
        &self,
        recipe: RecipeId,
    ) -> Result<Vec<Ingredient>, RecipePersistenceError>;

    async fn find_by_id(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, RecipePersistenceError>;

    async fn create(
        &self,
        recipe: &RecipeRef,
        text: &ItemText,
    ) -> Result<Ingredient, RecipePersistenceError>;

    /// Replace the text. `None` when the ingredient no longer exists.
    async fn update(
        &self,
        id: IngredientId,
        text: &ItemText,
    ) -> Result<Option<Ingredient>, RecipePersistenceError>;

    async fn delete(&self, id: IngredientId) -> Result<bool, RecipePersistenceError>;
}
