//! Applies the embedded schema migrations and exits.
//!
//! The database URL comes from `--database-url`, falling back to
//! `RECIPES_DATABASE_URL`.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use recipe_backend::outbound::persistence::run_migrations;
use tracing_subscriber::{EnvFilter, fmt};

const DATABASE_URL_ENV: &str = "RECIPES_DATABASE_URL";

/// `migrate` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "migrate",
    about = "Apply pending recipe schema migrations",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `RECIPES_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .try_init()
        .map_err(|err| eyre!("tracing init failed: {err}"))?;

    let args = CliArgs::parse();
    let url = resolve_database_url(args.database_url, env::var(DATABASE_URL_ENV).ok())?;
    let applied = run_migrations(&url).wrap_err("migration run failed")?;
    println!("applied {} migration(s)", applied.len());
    Ok(())
}

fn resolve_database_url(explicit: Option<String>, from_env: Option<String>) -> Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(eyre!("--database-url must not be empty when provided"));
        }
        return Ok(value);
    }

    let value = from_env
        .ok_or_else(|| eyre!("database URL missing: set --database-url or {DATABASE_URL_ENV}"))?;
    if value.trim().is_empty() {
        return Err(eyre!("{DATABASE_URL_ENV} must not be empty"));
    }
    Ok(value)
}
