//! PostgreSQL-backed `AuthTokenRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AuthTokenRepository, TokenPersistenceError};
use crate::domain::{AuthToken, UserId};

use super::diesel_basic_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{AuthTokenRow, NewAuthTokenRow};
use super::pool::{DbPool, PoolError};
use super::schema::auth_tokens;

/// Diesel-backed implementation of the [`AuthTokenRepository`] port.
#[derive(Clone)]
pub struct DieselAuthTokenRepository {
    pool: DbPool,
}

impl DieselAuthTokenRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TokenPersistenceError {
    TokenPersistenceError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> TokenPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => TokenPersistenceError::connection(message),
        DieselFailure::UniqueViolation { .. } => {
            TokenPersistenceError::query("token key collision")
        }
        DieselFailure::Query(message) => TokenPersistenceError::query(message),
    }
}

#[async_trait]
impl AuthTokenRepository for DieselAuthTokenRepository {
    async fn find_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<AuthToken>, TokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AuthTokenRow> = auth_tokens::table
            .filter(auth_tokens::user_id.eq(user_id.value()))
            .select(AuthTokenRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(|row| AuthToken::from_stored(row.key)))
    }

    async fn insert_for_user(
        &self,
        user_id: UserId,
        token: &AuthToken,
    ) -> Result<AuthToken, TokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // A concurrent exchange may have stored a token first; keep theirs.
        diesel::insert_into(auth_tokens::table)
            .values(&NewAuthTokenRow {
                key: token.as_str(),
                user_id: user_id.value(),
            })
            .on_conflict(auth_tokens::user_id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let stored: AuthTokenRow = auth_tokens::table
            .filter(auth_tokens::user_id.eq(user_id.value()))
            .select(AuthTokenRow::as_select())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(AuthToken::from_stored(stored.key))
    }

    async fn find_user(&self, token: &AuthToken) -> Result<Option<UserId>, TokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id: Option<i64> = auth_tokens::table
            .find(token.as_str())
            .select(auth_tokens::user_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(user_id.map(UserId::new))
    }
}
