//! Recipe domain service.
//!
//! Implements [`RecipesQuery`] and [`RecipesCommand`] over the recipe,
//! ingredient and step repositories. Mutations resolve their target, check
//! the caller's permission and only then validate the payload, so no write
//! is attempted before every check has passed.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    IngredientRepository, ItemInput, RecipeInput, RecipePersistenceError, RecipeRepository,
    RecipesCommand, RecipesQuery, StepRepository, Submitted,
};
use crate::domain::{
    Caller, Error, FieldError, FieldErrors, Ingredient, IngredientId, ItemText, Operation,
    OwnerOrReadOnly, Permission, Recipe, RecipeFilter, RecipeId, RecipeName,
    RecipeOwnerOrReadOnly, Step, StepId,
};

/// Message reported when an owner attempts to create a second recipe.
pub const ONE_RECIPE_PER_OWNER: &str = "This user already owns a recipe.";

const NOT_FOUND: &str = "Not found.";

/// Recipe service implementing the recipe driving ports.
#[derive(Clone)]
pub struct RecipeService<R, I, S> {
    recipes: Arc<R>,
    ingredients: Arc<I>,
    steps: Arc<S>,
}

impl<R, I, S> RecipeService<R, I, S> {
    /// Create a new service with the given repositories.
    pub fn new(recipes: Arc<R>, ingredients: Arc<I>, steps: Arc<S>) -> Self {
        Self {
            recipes,
            ingredients,
            steps,
        }
    }
}

fn map_persistence_error(error: RecipePersistenceError) -> Error {
    match error {
        RecipePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("recipe repository unavailable: {message}"))
        }
        RecipePersistenceError::Query { message } => {
            Error::internal(format!("recipe repository error: {message}"))
        }
        RecipePersistenceError::DuplicateOwner => FieldErrors::non_field(ONE_RECIPE_PER_OWNER),
    }
}

fn field_error(field: &str) -> impl FnOnce(FieldError) -> Error + '_ {
    move |err| FieldErrors::single(field, err.to_string())
}

fn not_found() -> Error {
    Error::not_found(NOT_FOUND)
}

impl<R, I, S> RecipeService<R, I, S>
where
    R: RecipeRepository,
    I: IngredientRepository,
    S: StepRepository,
{
    async fn load_recipe(&self, id: RecipeId) -> Result<Recipe, Error> {
        self.recipes
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(not_found)
    }

    async fn load_ingredient(&self, id: IngredientId) -> Result<Ingredient, Error> {
        self.ingredients
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(not_found)
    }

    async fn load_step(&self, id: StepId) -> Result<Step, Error> {
        self.steps
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(not_found)
    }

    /// Load the parent recipe and require the caller to own it.
    async fn owned_parent(&self, caller: &Caller, id: RecipeId) -> Result<Recipe, Error> {
        let recipe = self.load_recipe(id).await?;
        OwnerOrReadOnly
            .check(caller, &recipe, Operation::Create)
            .into_result()?;
        Ok(recipe)
    }
}

#[async_trait]
impl<R, I, S> RecipesQuery for RecipeService<R, I, S>
where
    R: RecipeRepository,
    I: IngredientRepository,
    S: StepRepository,
{
    async fn list_recipes(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>, Error> {
        self.recipes
            .list(filter)
            .await
            .map_err(map_persistence_error)
    }

    async fn get_recipe(&self, id: RecipeId) -> Result<Recipe, Error> {
        self.load_recipe(id).await
    }

    async fn list_ingredients(
        &self,
        recipe: RecipeId,
    ) -> Result<(Recipe, Vec<Ingredient>), Error> {
        let parent = self.load_recipe(recipe).await?;
        let items = self
            .ingredients
            .list_for_recipe(parent.id)
            .await
            .map_err(map_persistence_error)?;
        Ok((parent, items))
    }

    async fn get_ingredient(&self, id: IngredientId) -> Result<Ingredient, Error> {
        self.load_ingredient(id).await
    }

    async fn list_steps(&self, recipe: RecipeId) -> Result<(Recipe, Vec<Step>), Error> {
        let parent = self.load_recipe(recipe).await?;
        let items = self
            .steps
            .list_for_recipe(parent.id)
            .await
            .map_err(map_persistence_error)?;
        Ok((parent, items))
    }

    async fn get_step(&self, id: StepId) -> Result<Step, Error> {
        self.load_step(id).await
    }
}

#[async_trait]
impl<R, I, S> RecipesCommand for RecipeService<R, I, S>
where
    R: RecipeRepository,
    I: IngredientRepository,
    S: StepRepository,
{
    async fn create_recipe(
        &self,
        caller: Caller,
        input: Submitted<RecipeInput>,
    ) -> Result<Recipe, Error> {
        let owner = caller.require_user()?;
        let fields = input.into_fields()?;
        let name = RecipeName::parse(fields.name.as_deref()).map_err(field_error("name"))?;

        let existing = self
            .recipes
            .find_by_owner(owner)
            .await
            .map_err(map_persistence_error)?;
        if existing.is_some() {
            return Err(FieldErrors::non_field(ONE_RECIPE_PER_OWNER));
        }

        let recipe = self
            .recipes
            .create(owner, &name)
            .await
            .map_err(map_persistence_error)?;
        info!(recipe_id = %recipe.id, owner_id = %owner, "recipe created");
        Ok(recipe)
    }

    async fn update_recipe(
        &self,
        caller: Caller,
        id: RecipeId,
        input: Submitted<RecipeInput>,
    ) -> Result<Recipe, Error> {
        let recipe = self.load_recipe(id).await?;
        OwnerOrReadOnly
            .check(&caller, &recipe, Operation::Update)
            .into_result()?;
        let fields = input.into_fields()?;
        let name = RecipeName::parse(fields.name.as_deref()).map_err(field_error("name"))?;

        let updated = self
            .recipes
            .rename(recipe.id, &name)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(not_found)?;
        info!(recipe_id = %updated.id, "recipe updated");
        Ok(updated)
    }

    async fn delete_recipe(&self, caller: Caller, id: RecipeId) -> Result<(), Error> {
        let recipe = self.load_recipe(id).await?;
        OwnerOrReadOnly
            .check(&caller, &recipe, Operation::Delete)
            .into_result()?;

        let removed = self
            .recipes
            .delete(recipe.id)
            .await
            .map_err(map_persistence_error)?;
        if !removed {
            return Err(not_found());
        }
        info!(recipe_id = %recipe.id, "recipe deleted");
        Ok(())
    }

    async fn create_ingredient(
        &self,
        caller: Caller,
        recipe: RecipeId,
        input: Submitted<ItemInput>,
    ) -> Result<Ingredient, Error> {
        let parent = self.owned_parent(&caller, recipe).await?;
        let fields = input.into_fields()?;
        let text = ItemText::parse(fields.text.as_deref()).map_err(field_error("text"))?;

        let ingredient = self
            .ingredients
            .create(&parent.reference(), &text)
            .await
            .map_err(map_persistence_error)?;
        info!(ingredient_id = %ingredient.id, recipe_id = %parent.id, "ingredient created");
        Ok(ingredient)
    }

    async fn update_ingredient(
        &self,
        caller: Caller,
        id: IngredientId,
        input: Submitted<ItemInput>,
    ) -> Result<Ingredient, Error> {
        let ingredient = self.load_ingredient(id).await?;
        RecipeOwnerOrReadOnly
            .check(&caller, &ingredient, Operation::Update)
            .into_result()?;
        let fields = input.into_fields()?;
        let text = ItemText::parse(fields.text.as_deref()).map_err(field_error("text"))?;

        self.ingredients
            .update(ingredient.id, &text)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(not_found)
    }

    async fn delete_ingredient(&self, caller: Caller, id: IngredientId) -> Result<(), Error> {
        let ingredient = self.load_ingredient(id).await?;
        RecipeOwnerOrReadOnly
            .check(&caller, &ingredient, Operation::Delete)
            .into_result()?;

        let removed = self
            .ingredients
            .delete(ingredient.id)
            .await
            .map_err(map_persistence_error)?;
        if !removed {
            return Err(not_found());
        }
        info!(ingredient_id = %ingredient.id, "ingredient deleted");
        Ok(())
    }

    async fn create_step(
        &self,
        caller: Caller,
        recipe: RecipeId,
        input: Submitted<ItemInput>,
    ) -> Result<Step, Error> {
        let parent = self.owned_parent(&caller, recipe).await?;
        let fields = input.into_fields()?;
        let text = ItemText::parse(fields.text.as_deref()).map_err(field_error("step_text"))?;

        let step = self
            .steps
            .create(&parent.reference(), &text)
            .await
            .map_err(map_persistence_error)?;
        info!(step_id = %step.id, recipe_id = %parent.id, "step created");
        Ok(step)
    }

    async fn update_step(
        &self,
        caller: Caller,
        id: StepId,
        input: Submitted<ItemInput>,
    ) -> Result<Step, Error> {
        let step = self.load_step(id).await?;
        RecipeOwnerOrReadOnly
            .check(&caller, &step, Operation::Update)
            .into_result()?;
        let fields = input.into_fields()?;
        let text = ItemText::parse(fields.text.as_deref()).map_err(field_error("step_text"))?;

        self.steps
            .update(step.id, &text)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(not_found)
    }

    async fn delete_step(&self, caller: Caller, id: StepId) -> Result<(), Error> {
        let step = self.load_step(id).await?;
        RecipeOwnerOrReadOnly
            .check(&caller, &step, Operation::Delete)
            .into_result()?;

        let removed = self
            .steps
            .delete(step.id)
            .await
            .map_err(map_persistence_error)?;
        if !removed {
            return Err(not_found());
        }
        info!(step_id = %step.id, "step deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "recipe_service_tests.rs"]
mod tests;
