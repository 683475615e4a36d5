//! PostgreSQL-backed `IngredientRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{IngredientRepository, RecipePersistenceError};
use crate::domain::{Ingredient, IngredientId, ItemText, RecipeId, RecipeRef, UserId};

use super::diesel_recipe_repository::{map_diesel_error, map_pool_error};
use super::models::{IngredientRow, NewIngredientRow};
use super::pool::DbPool;
use super::schema::{ingredients, recipes};

/// Diesel-backed implementation of the [`IngredientRepository`] port.
#[derive(Clone)]
pub struct DieselIngredientRepository {
    pool: DbPool,
}

impl DieselIngredientRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_ingredient(
    (row, owner_id): (IngredientRow, i64),
) -> Result<Ingredient, RecipePersistenceError> {
    let text = ItemText::new(row.text).map_err(|err| {
        RecipePersistenceError::query(format!("stored ingredient {} has invalid text: {err}", row.id))
    })?;
    Ok(Ingredient {
        id: IngredientId::new(row.id),
        text,
        recipe: RecipeRef {
            id: RecipeId::new(row.recipe_id),
            owner_id: UserId::new(owner_id),
        },
    })
}

async fn load_ingredient(
    conn: &mut AsyncPgConnection,
    id: IngredientId,
) -> Result<Option<Ingredient>, RecipePersistenceError> {
    let row: Option<(IngredientRow, i64)> = ingredients::table
        .inner_join(recipes::table)
        .filter(ingredients::id.eq(id.value()))
        .select((IngredientRow::as_select(), recipes::owner_id))
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
    row.map(row_to_ingredient).transpose()
}

#[async_trait]
impl IngredientRepository for DieselIngredientRepository {
    async fn list_for_recipe(
        &self,
        recipe: RecipeId,
    ) -> Result<Vec<Ingredient>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(IngredientRow, i64)> = ingredients::table
            .inner_join(recipes::table)
            .filter(ingredients::recipe_id.eq(recipe.value()))
            .select((IngredientRow::as_select(), recipes::owner_id))
            .order(ingredients::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_ingredient).collect()
    }

    async fn find_by_id(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_ingredient(&mut conn, id).await
    }

    async fn create(
        &self,
        recipe: &RecipeRef,
        text: &ItemText,
    ) -> Result<Ingredient, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: IngredientRow = diesel::insert_into(ingredients::table)
            .values(&NewIngredientRow {
                recipe_id: recipe.id.value(),
                text: text.as_str(),
            })
            .returning(IngredientRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_ingredient((row, recipe.owner_id.value()))
    }

    async fn update(
        &self,
        id: IngredientId,
        text: &ItemText,
    ) -> Result<Option<Ingredient>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(ingredients::table.find(id.value()))
            .set(ingredients::text.eq(text.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Ok(None);
        }
        load_ingredient(&mut conn, id).await
    }

    async fn delete(&self, id: IngredientId) -> Result<bool, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(ingredients::table.find(id.value()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
