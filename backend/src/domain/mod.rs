//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities used by the API and persistence
//! layers, the rules that govern them, and the services that implement the
//! driving ports.
//!
//! Public surface:
//! - Error / ErrorCode / FieldErrors: transport agnostic failures.
//! - User, Recipe, Ingredient, Step and their value types.
//! - RecipeFilter: declarative recipe query.
//! - Permission predicates and the request [`Caller`].
//! - RecipeService / AccountService: use-case implementations.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod permissions;
pub mod ports;
pub mod recipe;
pub mod recipe_filter;
pub mod recipe_service;
pub mod trace_id;
pub mod user;
pub mod validation;

pub use self::account_service::AccountService;
pub use self::auth::{
    AuthToken, LoginCredentials, LoginValidationError, PasswordHash, TOKEN_KEY_LEN,
};
pub use self::error::{
    Error, ErrorCode, ErrorValidationError, FieldErrors, NON_FIELD_ERRORS, TRACE_ID_HEADER,
};
pub use self::permissions::{
    Caller, Decision, DenyReason, Operation, OwnerOrReadOnly, Permission, RecipeOwnerOrReadOnly,
    SelfOnly,
};
pub use self::recipe::{
    Ingredient, IngredientId, ItemText, Owned, RECIPE_NAME_MAX, Recipe, RecipeChild, RecipeId,
    RecipeName, RecipeRef, Step, StepId,
};
pub use self::recipe_filter::{
    FILTER_PARAMS, FilterClause, FilterField, FilterValue, Lookup, RecipeFilter,
};
pub use self::recipe_service::RecipeService;
pub use self::trace_id::TraceId;
pub use self::user::{
    EmailAddress, NewUser, Password, PersonName, RegistrationInput, User, UserId, Username,
};
pub use self::validation::FieldError;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use recipe_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
