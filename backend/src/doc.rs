//! OpenAPI document for the REST API.
//!
//! Served by Swagger UI at `/docs` in debug builds and written to stdout by
//! the `openapi-dump` binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::auth::{CredentialsRequest, TokenResponse};
use crate::inbound::http::collection::{
    Collection, DataField, Document, Item, Link, Query, Template,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Registers the token header and the session cookie as security schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "TokenAuth",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "`Token <key>` from POST /api/v1/auth-token/.",
            ))),
        );
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login/.",
            ))),
        );
    }
}

/// OpenAPI document for every `/api/v1` route and the health probes.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Recipe backend API",
        description = "Collection+JSON resources for recipes, their ingredients and steps, and user accounts."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("TokenAuth" = []), ("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::obtain_token,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::register_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::search_recipes,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::update_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::ingredients::list_ingredients,
        crate::inbound::http::ingredients::create_ingredient,
        crate::inbound::http::ingredients::get_ingredient,
        crate::inbound::http::ingredients::update_ingredient,
        crate::inbound::http::ingredients::delete_ingredient,
        crate::inbound::http::steps::list_steps,
        crate::inbound::http::steps::create_step,
        crate::inbound::http::steps::get_step,
        crate::inbound::http::steps::update_step,
        crate::inbound::http::steps::delete_step,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        Document,
        Collection,
        Item,
        DataField,
        Link,
        Query,
        Template,
        TokenResponse,
        CredentialsRequest,
    )),
    tags(
        (name = "recipes", description = "Recipes, one per user"),
        (name = "ingredients", description = "Ingredients of a recipe"),
        (name = "steps", description = "Steps of a recipe"),
        (name = "users", description = "Registration and profiles"),
        (name = "auth", description = "Tokens and browser sessions"),
        (name = "health", description = "Orchestration probes")
    )
)]
pub struct ApiDoc;
