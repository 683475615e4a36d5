//! Account domain service: registration, credential checks and API tokens.
//!
//! Argon2 hashing and verification run on the blocking thread pool so they
//! never stall the async workers.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AuthTokenRepository, LoginService, NewUserRecord, RecipePersistenceError, RecipeRepository,
    TokenPersistenceError, UserAccounts, UserPersistenceError, UserProfile, UserRepository,
};
use crate::domain::{
    AuthToken, Caller, EmailAddress, Error, FieldError, FieldErrors, LoginCredentials, NewUser,
    Operation, Password, PasswordHash, Permission, RegistrationInput, SelfOnly, UserId,
    Username,
};

/// Message reported when credentials do not match a user.
pub const INVALID_CREDENTIALS: &str = "Unable to log in with provided credentials.";

/// Account service implementing [`LoginService`] and [`UserAccounts`].
#[derive(Clone)]
pub struct AccountService<U, T, R> {
    users: Arc<U>,
    tokens: Arc<T>,
    recipes: Arc<R>,
}

impl<U, T, R> AccountService<U, T, R> {
    /// Create a new service with the given repositories.
    pub fn new(users: Arc<U>, tokens: Arc<T>, recipes: Arc<R>) -> Self {
        Self {
            users,
            tokens,
            recipes,
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername => {
            FieldErrors::single("username", FieldError::NotUnique.to_string())
        }
        UserPersistenceError::DuplicateEmail => {
            FieldErrors::single("email", FieldError::NotUnique.to_string())
        }
    }
}

fn map_token_error(error: TokenPersistenceError) -> Error {
    match error {
        TokenPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("token repository unavailable: {message}"))
        }
        TokenPersistenceError::Query { message } => {
            Error::internal(format!("token repository error: {message}"))
        }
    }
}

fn map_recipe_error(error: RecipePersistenceError) -> Error {
    match error {
        RecipePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("recipe repository unavailable: {message}"))
        }
        other => Error::internal(format!("recipe repository error: {other}")),
    }
}

async fn hash_password(password: Password) -> Result<PasswordHash, Error> {
    tokio::task::spawn_blocking(move || PasswordHash::hash(&password))
        .await
        .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
        .map_err(|err| Error::internal(format!("password hashing failed: {err}")))
}

async fn verify_password(hash: PasswordHash, candidate: &str) -> Result<bool, Error> {
    let candidate = Zeroizing::new(candidate.to_owned());
    tokio::task::spawn_blocking(move || hash.verify(&candidate))
        .await
        .map_err(|err| Error::internal(format!("password verification task failed: {err}")))
}

impl<U, T, R> AccountService<U, T, R>
where
    U: UserRepository,
    T: AuthTokenRepository,
    R: RecipeRepository,
{
    async fn profile(&self, id: UserId) -> Result<Option<UserProfile>, Error> {
        let Some(user) = self.users.find_by_id(id).await.map_err(map_user_error)? else {
            return Ok(None);
        };
        let recipe = self
            .recipes
            .find_by_owner(id)
            .await
            .map_err(map_recipe_error)?
            .map(|recipe| recipe.id);
        Ok(Some(UserProfile { user, recipe }))
    }

    /// Record uniqueness failures for fields that parsed successfully.
    async fn check_unique(
        &self,
        input: &RegistrationInput,
        errors: &mut FieldErrors,
    ) -> Result<(), Error> {
        if let Ok(username) = Username::parse(input.username.as_deref()) {
            let taken = self
                .users
                .username_taken(&username)
                .await
                .map_err(map_user_error)?;
            if taken {
                errors.add("username", FieldError::NotUnique.to_string());
            }
        }
        if let Ok(email) = EmailAddress::parse(input.email.as_deref()) {
            let taken = self
                .users
                .email_taken(&email)
                .await
                .map_err(map_user_error)?;
            if taken {
                errors.add("email", FieldError::NotUnique.to_string());
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<U, T, R> LoginService for AccountService<U, T, R>
where
    U: UserRepository,
    T: AuthTokenRepository,
    R: RecipeRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let stored = self
            .users
            .find_credentials(credentials.username())
            .await
            .map_err(map_user_error)?;
        let Some(stored) = stored else {
            debug!("login rejected: unknown username");
            return Err(FieldErrors::non_field(INVALID_CREDENTIALS));
        };
        if !verify_password(stored.password_hash, credentials.password()).await? {
            debug!(user_id = %stored.user_id, "login rejected: password mismatch");
            return Err(FieldErrors::non_field(INVALID_CREDENTIALS));
        }
        Ok(stored.user_id)
    }

    async fn obtain_token(&self, credentials: &LoginCredentials) -> Result<AuthToken, Error> {
        let user_id = self.authenticate(credentials).await?;
        if let Some(token) = self
            .tokens
            .find_for_user(user_id)
            .await
            .map_err(map_token_error)?
        {
            return Ok(token);
        }
        let token = self
            .tokens
            .insert_for_user(user_id, &AuthToken::generate())
            .await
            .map_err(map_token_error)?;
        info!(user_id = %user_id, "api token issued");
        Ok(token)
    }

    async fn resolve_token(&self, token: &AuthToken) -> Result<UserId, Error> {
        self.tokens
            .find_user(token)
            .await
            .map_err(map_token_error)?
            .ok_or_else(|| Error::unauthorized("Invalid token."))
    }
}

#[async_trait]
impl<U, T, R> UserAccounts for AccountService<U, T, R>
where
    U: UserRepository,
    T: AuthTokenRepository,
    R: RecipeRepository,
{
    async fn register(&self, input: RegistrationInput) -> Result<UserProfile, Error> {
        let (mut errors, validated) = match NewUser::validate(&input) {
            Ok(user) => (FieldErrors::default(), Some(user)),
            Err(errors) => (errors, None),
        };
        self.check_unique(&input, &mut errors).await?;
        errors.into_result()?;
        let new_user =
            validated.ok_or_else(|| Error::internal("registration passed without a user"))?;

        let NewUser {
            username,
            email,
            password,
            first_name,
            last_name,
        } = new_user;
        let record = NewUserRecord {
            username,
            email,
            password_hash: hash_password(password).await?,
            first_name,
            last_name,
        };
        let user = self.users.create(&record).await.map_err(map_user_error)?;
        info!(user_id = %user.id(), "user registered");
        Ok(UserProfile { user, recipe: None })
    }

    async fn get_user(&self, caller: Caller, id: UserId) -> Result<UserProfile, Error> {
        caller.require_user()?;
        let profile = self
            .profile(id)
            .await?
            .ok_or_else(|| Error::not_found("Not found."))?;
        SelfOnly
            .check(&caller, &profile.user.id(), Operation::Read)
            .into_result()?;
        Ok(profile)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
