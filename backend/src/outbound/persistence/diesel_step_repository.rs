//! PostgreSQL-backed `StepRepository` implementation using Diesel ORM.
//!
//! Steps keep their insertion order, which is the order of their ids.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{RecipePersistenceError, StepRepository};
use crate::domain::{ItemText, RecipeId, RecipeRef, Step, StepId, UserId};

use super::diesel_recipe_repository::{map_diesel_error, map_pool_error};
use super::models::{NewStepRow, StepRow};
use super::pool::DbPool;
use super::schema::{recipes, steps};

/// Diesel-backed implementation of the [`StepRepository`] port.
#[derive(Clone)]
pub struct DieselStepRepository {
    pool: DbPool,
}

impl DieselStepRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_step((row, owner_id): (StepRow, i64)) -> Result<Step, RecipePersistenceError> {
    let text = ItemText::new(row.step_text).map_err(|err| {
        RecipePersistenceError::query(format!("stored step {} has invalid step_text: {err}", row.id))
    })?;
    Ok(Step {
        id: StepId::new(row.id),
        step_text: text,
        recipe: RecipeRef {
            id: RecipeId::new(row.recipe_id),
            owner_id: UserId::new(owner_id),
        },
    })
}

async fn load_step(
    conn: &mut AsyncPgConnection,
    id: StepId,
) -> Result<Option<Step>, RecipePersistenceError> {
    let row: Option<(StepRow, i64)> = steps::table
        .inner_join(recipes::table)
        .filter(steps::id.eq(id.value()))
        .select((StepRow::as_select(), recipes::owner_id))
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
    row.map(row_to_step).transpose()
}

#[async_trait]
impl StepRepository for DieselStepRepository {
    async fn list_for_recipe(
        &self,
        recipe: RecipeId,
    ) -> Result<Vec<Step>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(StepRow, i64)> = steps::table
            .inner_join(recipes::table)
            .filter(steps::recipe_id.eq(recipe.value()))
            .select((StepRow::as_select(), recipes::owner_id))
            .order(steps::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_step).collect()
    }

    async fn find_by_id(
        &self,
        id: StepId,
    ) -> Result<Option<Step>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_step(&mut conn, id).await
    }

    async fn create(
        &self,
        recipe: &RecipeRef,
        text: &ItemText,
    ) -> Result<Step, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: StepRow = diesel::insert_into(steps::table)
            .values(&NewStepRow {
                recipe_id: recipe.id.value(),
                step_text: text.as_str(),
            })
            .returning(StepRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_step((row, recipe.owner_id.value()))
    }

    async fn update(
        &self,
        id: StepId,
        text: &ItemText,
    ) -> Result<Option<Step>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(steps::table.find(id.value()))
            .set(steps::step_text.eq(text.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Ok(None);
        }
        load_step(&mut conn, id).await
    }

    async fn delete(&self, id: StepId) -> Result<bool, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(steps::table.find(id.value()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn row_to_step_builds_parent_reference() {
        let row = StepRow {
            id: 9,
            recipe_id: 2,
            step_text: "step1".to_owned(),
        };
        let step = row_to_step((row, 5)).expect("valid row");
        assert_eq!(step.recipe.id, RecipeId::new(2));
        assert_eq!(step.recipe.owner_id, UserId::new(5));
        assert_eq!(step.step_text.as_str(), "step1");
    }

    #[rstest]
    fn blank_stored_text_is_a_query_error() {
        let row = StepRow {
            id: 9,
            recipe_id: 2,
            step_text: "   ".to_owned(),
        };
        let err = row_to_step((row, 5)).expect_err("blank text");
        assert!(matches!(err, RecipePersistenceError::Query { .. }));
    }
}
