//! Driving port for recipe mutations.
//!
//! Every operation resolves its target first (404), then checks the
//! caller's permission (401/403), then reads and validates the payload
//! (400). A body that could not be parsed travels as
//! [`Submitted::Malformed`] so it is reported in that same order.

use async_trait::async_trait;

use crate::domain::{
    Caller, Error, Ingredient, IngredientId, Recipe, RecipeId, Step, StepId,
};

/// Client payload handed to a command, parsed or not.
#[derive(Debug, Clone, PartialEq)]
pub enum Submitted<T> {
    /// Fields read from a well-formed body.
    Fields(T),
    /// The body could not be read; surfaced once the checks have passed.
    Malformed(Error),
}

impl<T> Submitted<T> {
    /// The submitted fields, or the parse error.
    pub fn into_fields(self) -> Result<T, Error> {
        match self {
            Self::Fields(fields) => Ok(fields),
            Self::Malformed(error) => Err(error),
        }
    }

    /// Borrow the fields when the body was readable.
    pub fn fields(&self) -> Option<&T> {
        match self {
            Self::Fields(fields) => Some(fields),
            Self::Malformed(_) => None,
        }
    }
}

impl<T> From<Result<T, Error>> for Submitted<T> {
    fn from(parsed: Result<T, Error>) -> Self {
        match parsed {
            Ok(fields) => Self::Fields(fields),
            Err(error) => Self::Malformed(error),
        }
    }
}

/// Raw recipe fields submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeInput {
    pub name: Option<String>,
}

/// Raw ingredient or step text submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemInput {
    pub text: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipesCommand: Send + Sync {
    /// Create a recipe owned by the caller.
    async fn create_recipe(
        &self,
        caller: Caller,
        input: Submitted<RecipeInput>,
    ) -> Result<Recipe, Error>;

    async fn update_recipe(
        &self,
        caller: Caller,
        id: RecipeId,
        input: Submitted<RecipeInput>,
    ) -> Result<Recipe, Error>;

    /// Delete a recipe together with its ingredients and steps.
    async fn delete_recipe(&self, caller: Caller, id: RecipeId) -> Result<(), Error>;

    /// Attach an ingredient to a recipe the caller owns.
    async fn create_ingredient(
        &self,
        caller: Caller,
        recipe: RecipeId,
        input: Submitted<ItemInput>,
    ) -> Result<Ingredient, Error>;

    async fn update_ingredient(
        &self,
        caller: Caller,
        id: IngredientId,
        input: Submitted<ItemInput>,
    ) -> Result<Ingredient, Error>;

    async fn delete_ingredient(&self, caller: Caller, id: IngredientId) -> Result<(), Error>;

    /// Attach a step to a recipe the caller owns.
    async fn create_step(
        &self,
        caller: Caller,
        recipe: RecipeId,
        input: Submitted<ItemInput>,
    ) -> Result<Step, Error>;

    async fn update_step(
        &self,
        caller: Caller,
        id: StepId,
        input: Submitted<ItemInput>,
    ) -> Result<Step, Error>;

    async fn delete_step(&self, caller: Caller, id: StepId) -> Result<(), Error>;
}
