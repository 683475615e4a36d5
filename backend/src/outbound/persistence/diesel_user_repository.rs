//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NewUserRecord, StoredCredentials, UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, PasswordHash, PersonName, User, UserId, Username};

use super::diesel_basic_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{CredentialRow, NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    match classify_diesel_error(error) {
        failure if failure.violates("username") => UserPersistenceError::duplicate_username(),
        failure if failure.violates("email") => UserPersistenceError::duplicate_email(),
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::UniqueViolation { .. } => {
            UserPersistenceError::query("unexpected unique violation")
        }
        DieselFailure::Query(message) => UserPersistenceError::query(message),
    }
}

/// Convert a database row to a domain user, re-validating stored values.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let invalid = |field: &str, err: crate::domain::FieldError| {
        UserPersistenceError::query(format!("stored user {} has invalid {field}: {err}", row.id))
    };
    let username = Username::new(row.username.as_str()).map_err(|err| invalid("username", err))?;
    let email = EmailAddress::new(row.email.as_str()).map_err(|err| invalid("email", err))?;
    let first_name =
        PersonName::parse(Some(row.first_name.as_str())).map_err(|err| invalid("first_name", err))?;
    let last_name =
        PersonName::parse(Some(row.last_name.as_str())).map_err(|err| invalid("last_name", err))?;
    Ok(User::new(
        UserId::new(row.id),
        username,
        email,
        first_name,
        last_name,
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUserRecord) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            username: user.username.as_str(),
            email: user.email.as_str(),
            password_hash: user.password_hash.as_str(),
            first_name: user.first_name.as_str(),
            last_name: user.last_name.as_str(),
        };

        let stored: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_user(stored)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.value())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CredentialRow> = users::table
            .filter(users::username.eq(username))
            .select(CredentialRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(|row| StoredCredentials {
            user_id: UserId::new(row.id),
            password_hash: PasswordHash::from_stored(row.password_hash),
        }))
    }

    async fn username_taken(&self, username: &Username) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            users::table.filter(users::username.eq(username.as_str())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn email_taken(&self, email: &EmailAddress) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            users::table.filter(users::email.eq(email.as_str())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    //! Row mapping coverage; query behaviour needs a live PostgreSQL.
    use super::*;
    use rstest::rstest;

    fn row(username: &str, email: &str) -> UserRow {
        UserRow {
            id: 4,
            username: username.to_owned(),
            email: email.to_owned(),
            first_name: "Ada".to_owned(),
            last_name: String::new(),
        }
    }

    #[rstest]
    fn row_to_user_maps_columns() {
        let user = row_to_user(row("foo", "foo@example.com")).expect("valid row");
        assert_eq!(user.id(), UserId::new(4));
        assert_eq!(user.username().as_str(), "foo");
        assert_eq!(user.first_name().as_str(), "Ada");
        assert_eq!(user.last_name().as_str(), "");
    }

    #[rstest]
    fn row_to_user_rejects_corrupt_values() {
        let err = row_to_user(row("foo", "not-an-email")).expect_err("invalid email");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }

    #[rstest]
    fn pool_failures_are_connection_errors() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, UserPersistenceError::connection("timed out"));
    }
}
