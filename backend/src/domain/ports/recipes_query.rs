//! Driving port for read-only recipe use-cases.
//!
//! Reads never require authentication. Child listings resolve the parent
//! recipe first so a missing recipe is reported as not found.

use async_trait::async_trait;

use crate::domain::{
    Error, Ingredient, IngredientId, Recipe, RecipeFilter, RecipeId, Step, StepId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipesQuery: Send + Sync {
    async fn list_recipes(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>, Error>;

    async fn get_recipe(&self, id: RecipeId) -> Result<Recipe, Error>;

    /// The parent recipe together with its ingredients.
    async fn list_ingredients(&self, recipe: RecipeId)
    -> Result<(Recipe, Vec<Ingredient>), Error>;

    async fn get_ingredient(&self, id: IngredientId) -> Result<Ingredient, Error>;

    /// The parent recipe together with its steps.
    async fn list_steps(&self, recipe: RecipeId) -> Result<(Recipe, Vec<Step>), Error>;

    async fn get_step(&self, id: StepId) -> Result<Step, Error>;
}
