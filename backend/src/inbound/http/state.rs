//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! tests can swap in mocks or the in-memory store without touching I/O.

use std::sync::Arc;

use crate::domain::ports::{LoginService, RecipesCommand, RecipesQuery, UserAccounts};

/// Parameter object bundling the port implementations handlers need.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn UserAccounts>,
    pub recipes: Arc<dyn RecipesQuery>,
    pub recipe_commands: Arc<dyn RecipesCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn UserAccounts>,
    pub recipes: Arc<dyn RecipesQuery>,
    pub recipe_commands: Arc<dyn RecipesCommand>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use recipe_backend::domain::{AccountService, RecipeService};
    /// use recipe_backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use recipe_backend::outbound::memory::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let accounts = Arc::new(AccountService::new(store.clone(), store.clone(), store.clone()));
    /// let recipes = Arc::new(RecipeService::new(store.clone(), store.clone(), store));
    /// let state = HttpState::new(HttpStatePorts {
    ///     login: accounts.clone(),
    ///     accounts,
    ///     recipes: recipes.clone(),
    ///     recipe_commands: recipes,
    /// });
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            accounts,
            recipes,
            recipe_commands,
        } = ports;
        Self {
            login,
            accounts,
            recipes,
            recipe_commands,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
