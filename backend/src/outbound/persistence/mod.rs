//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the driven repository ports, backed by
//! PostgreSQL through `diesel-async` and a `bb8` pool.
//!
//! - Row structs (`models.rs`) and the table DSL (`schema.rs`) stay private
//!   to this module.
//! - Database failures are classified once and mapped onto each port's
//!   error type, so unique violations surface as duplicate variants.
//! - Deleting a recipe relies on `ON DELETE CASCADE` for its children.
//!
//! # Example
//!
//! ```ignore
//! use recipe_backend::outbound::persistence::{DbPool, DieselRecipeRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/recipes")).await?;
//! let recipes = DieselRecipeRepository::new(pool);
//! ```

mod diesel_auth_token_repository;
mod diesel_basic_error_mapping;
mod diesel_ingredient_repository;
mod diesel_recipe_repository;
mod diesel_step_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_auth_token_repository::DieselAuthTokenRepository;
pub use diesel_ingredient_repository::DieselIngredientRepository;
pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_step_repository::DieselStepRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DEFAULT_MAX_SIZE, DbPool, PoolConfig, PoolError};
