//! PostgreSQL-backed `RecipeRepository` implementation using Diesel ORM.
//!
//! Recipes are always read joined to their owner so the username travels
//! with the row. Filter clauses become SQL predicates on that join.

use async_trait::async_trait;
use diesel::dsl;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{RecipePersistenceError, RecipeRepository};
use crate::domain::{
    FilterClause, FilterField, FilterValue, Lookup, Recipe, RecipeFilter, RecipeId, RecipeName,
    UserId, Username,
};

use super::diesel_basic_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{NewRecipeRow, RecipeRow};
use super::pool::{DbPool, PoolError};
use super::schema::{recipes, users};

define_sql_function!(fn lower(value: diesel::sql_types::Text) -> diesel::sql_types::Text);

type RecipeWithOwnerQuery = dsl::IntoBoxed<
    'static,
    dsl::Select<
        dsl::InnerJoin<recipes::table, users::table>,
        (dsl::AsSelect<RecipeRow, Pg>, users::username),
    >,
    Pg,
>;

/// Diesel-backed implementation of the [`RecipeRepository`] port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(super) fn map_pool_error(error: PoolError) -> RecipePersistenceError {
    RecipePersistenceError::connection(pool_error_message(error))
}

pub(super) fn map_diesel_error(error: diesel::result::Error) -> RecipePersistenceError {
    match classify_diesel_error(error) {
        failure if failure.violates("owner_id") => RecipePersistenceError::duplicate_owner(),
        DieselFailure::Connection(message) => RecipePersistenceError::connection(message),
        DieselFailure::UniqueViolation { .. } => {
            RecipePersistenceError::query("unexpected unique violation")
        }
        DieselFailure::Query(message) => RecipePersistenceError::query(message),
    }
}

fn recipes_with_owner() -> RecipeWithOwnerQuery {
    recipes::table
        .inner_join(users::table)
        .select((RecipeRow::as_select(), users::username))
        .into_boxed()
}

/// Escape LIKE metacharacters and wrap `fragment` for a substring match.
fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Narrow `query` by one clause. `None` when the clause can never match.
fn apply_clause(
    query: RecipeWithOwnerQuery,
    clause: &FilterClause,
) -> Option<RecipeWithOwnerQuery> {
    let narrowed = match (clause.field, clause.lookup, &clause.value) {
        (FilterField::Id, Lookup::Exact, FilterValue::Id(id)) => {
            query.filter(recipes::id.eq(id.value()))
        }
        (FilterField::Name, Lookup::Exact, FilterValue::Text(text)) => {
            query.filter(recipes::name.eq(text.clone()))
        }
        (FilterField::Name, Lookup::IContains, FilterValue::Text(text)) => {
            query.filter(recipes::name.ilike(contains_pattern(text)))
        }
        (FilterField::OwnerUsername, Lookup::Exact, FilterValue::Text(text)) => {
            query.filter(users::username.eq(text.clone()))
        }
        (FilterField::OwnerUsername, Lookup::IContains, FilterValue::Text(text)) => {
            query.filter(users::username.ilike(contains_pattern(text)))
        }
        _ => return None,
    };
    Some(narrowed)
}

fn row_to_recipe(
    (row, username): (RecipeRow, String),
) -> Result<Recipe, RecipePersistenceError> {
    let invalid = |field: &str, err: crate::domain::FieldError| {
        RecipePersistenceError::query(format!("stored recipe {} has invalid {field}: {err}", row.id))
    };
    let name = RecipeName::new(row.name.as_str()).map_err(|err| invalid("name", err))?;
    let owner_username = Username::new(username).map_err(|err| invalid("owner", err))?;
    Ok(Recipe {
        id: RecipeId::new(row.id),
        name,
        owner_id: UserId::new(row.owner_id),
        owner_username,
    })
}

async fn load_recipe(
    conn: &mut AsyncPgConnection,
    id: RecipeId,
) -> Result<Option<Recipe>, RecipePersistenceError> {
    let row: Option<(RecipeRow, String)> = recipes_with_owner()
        .filter(recipes::id.eq(id.value()))
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
    row.map(row_to_recipe).transpose()
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn list(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>, RecipePersistenceError> {
        let mut query = recipes_with_owner();
        for clause in filter.clauses() {
            match apply_clause(query, clause) {
                Some(narrowed) => query = narrowed,
                None => return Ok(Vec::new()),
            }
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(RecipeRow, String)> = query
            .order((
                lower(recipes::name).asc(),
                recipes::name.asc(),
                recipes::id.asc(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_recipe).collect()
    }

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_recipe(&mut conn, id).await
    }

    async fn find_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Option<Recipe>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(RecipeRow, String)> = recipes_with_owner()
            .filter(recipes::owner_id.eq(owner.value()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_recipe).transpose()
    }

    async fn create(
        &self,
        owner: UserId,
        name: &RecipeName,
    ) -> Result<Recipe, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id: i64 = diesel::insert_into(recipes::table)
            .values(&NewRecipeRow {
                name: name.as_str(),
                owner_id: owner.value(),
            })
            .returning(recipes::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        load_recipe(&mut conn, RecipeId::new(id))
            .await?
            .ok_or_else(|| RecipePersistenceError::query("inserted recipe vanished"))
    }

    async fn rename(
        &self,
        id: RecipeId,
        name: &RecipeName,
    ) -> Result<Option<Recipe>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(recipes::table.find(id.value()))
            .set(recipes::name.eq(name.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Ok(None);
        }
        load_recipe(&mut conn, id).await
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Ingredients and steps go with it through ON DELETE CASCADE.
        let deleted = diesel::delete(recipes::table.find(id.value()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
