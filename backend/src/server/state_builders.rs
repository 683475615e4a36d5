//! Port wiring for the HTTP adapter.
//!
//! With a pool every port is backed by Diesel; without one the services run
//! over a process-local [`InMemoryStore`].

use std::sync::Arc;

use actix_web::web;
use recipe_backend::domain::{AccountService, RecipeService};
use recipe_backend::inbound::http::state::{HttpState, HttpStatePorts};
use recipe_backend::outbound::memory::InMemoryStore;
use recipe_backend::outbound::persistence::{
    DbPool, DieselAuthTokenRepository, DieselIngredientRepository, DieselRecipeRepository,
    DieselStepRepository, DieselUserRepository,
};
use tracing::{info, warn};

use super::ServerConfig;

fn diesel_ports(pool: &DbPool) -> HttpStatePorts {
    let recipes = Arc::new(DieselRecipeRepository::new(pool.clone()));
    let accounts = Arc::new(AccountService::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselAuthTokenRepository::new(pool.clone())),
        recipes.clone(),
    ));
    let service = Arc::new(RecipeService::new(
        recipes,
        Arc::new(DieselIngredientRepository::new(pool.clone())),
        Arc::new(DieselStepRepository::new(pool.clone())),
    ));
    HttpStatePorts {
        login: accounts.clone(),
        accounts,
        recipes: service.clone(),
        recipe_commands: service,
    }
}

fn memory_ports() -> HttpStatePorts {
    let store = Arc::new(InMemoryStore::new());
    let accounts = Arc::new(AccountService::new(
        store.clone(),
        store.clone(),
        store.clone(),
    ));
    let service = Arc::new(RecipeService::new(store.clone(), store.clone(), store));
    HttpStatePorts {
        login: accounts.clone(),
        accounts,
        recipes: service.clone(),
        recipe_commands: service,
    }
}

pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let ports = match &config.db_pool {
        Some(pool) => {
            info!("serving from PostgreSQL");
            diesel_ports(pool)
        }
        None => {
            warn!("no database configured; data lives in memory and is lost on exit");
            memory_ports()
        }
    };
    web::Data::new(HttpState::new(ports))
}
