//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::web;

use crate::domain::ports::{
    MockLoginService, MockRecipesCommand, MockRecipesQuery, MockUserAccounts,
};
use crate::domain::{AccountService, RecipeService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryStore;

/// Cookie sessions named `session` with a fresh key and no `Secure` flag.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// One mock per driving port; set expectations, then call [`Self::into_state`].
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub accounts: MockUserAccounts,
    pub recipes: MockRecipesQuery,
    pub recipe_commands: MockRecipesCommand,
}

impl MockPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(HttpStatePorts {
            login: Arc::new(self.login),
            accounts: Arc::new(self.accounts),
            recipes: Arc::new(self.recipes),
            recipe_commands: Arc::new(self.recipe_commands),
        }))
    }
}

/// Real services over a fresh [`InMemoryStore`].
pub fn memory_state() -> web::Data<HttpState> {
    let store = Arc::new(InMemoryStore::new());
    let accounts = Arc::new(AccountService::new(
        store.clone(),
        store.clone(),
        store.clone(),
    ));
    let recipes = Arc::new(RecipeService::new(store.clone(), store.clone(), store));
    web::Data::new(HttpState::new(HttpStatePorts {
        login: accounts.clone(),
        accounts,
        recipes: recipes.clone(),
        recipe_commands: recipes,
    }))
}
