//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM.
//! - **memory**: mutex-guarded in-process store used when no database is
//!   configured and by tests.
//!
//! Adapters only translate between domain types and storage; they hold no
//! business rules beyond the constraints the store itself enforces.

pub mod memory;
pub mod persistence;
