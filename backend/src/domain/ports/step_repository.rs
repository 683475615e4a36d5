//! Port abstraction for step persistence.
//!
//! Steps are listed per recipe in insertion order.

use async_trait::async_trait;

use crate::domain::{ItemText, RecipeId, RecipeRef, Step, StepId};

use super::RecipePersistenceError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StepRepository: Send + Sync {
    async fn list_for_recipe(
        &self,
        recipe: RecipeId,
    ) -> Result<Vec<Step>, RecipePersistenceError>;

    async fn find_by_id(
        &self,
        id: StepId,
    ) -> Result<Option<Step>, RecipePersistenceError>;

    async fn create(
        &self,
        recipe: &RecipeRef,
        text: &ItemText,
    ) -> Result<Step, RecipePersistenceError>;

    /// Replace the text. `None` when the step no longer exists.
    async fn update(
        &self,
        id: StepId,
        text: &ItemText,
    ) -> Result<Option<Step>, RecipePersistenceError>;

    async fn delete(&self, id: StepId) -> Result<bool, RecipePersistenceError>;
}
