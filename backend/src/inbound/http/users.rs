//! User registration and profile handlers.
//!
//! ```text
//! GET  /api/v1/users/       registration template (no users are listed)
//! POST /api/v1/users/       register
//! GET  /api/v1/users/{id}/  own profile only
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::domain::ports::UserProfile;
use crate::domain::{Caller, RegistrationInput, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::collection::{Collection, Document, Item, WriteFields};
use crate::inbound::http::links::Links;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Fields accepted by registration.
pub const USER_TEMPLATE: [&str; 5] = ["username", "email", "password", "first_name", "last_name"];

/// Render a user; the `recipe` link only appears once they own one.
pub(crate) fn user_item(links: &Links, profile: &UserProfile) -> Item {
    let user = &profile.user;
    let item = Item::new(links.user(user.id()))
        .datum("username", user.username().as_str())
        .datum("first_name", user.first_name().as_str())
        .datum("last_name", user.last_name().as_str())
        .datum("email", user.email().as_str());
    match profile.recipe {
        Some(recipe) => item.link("recipe", links.recipe(recipe)),
        None => item,
    }
}

fn registration_input(body: &[u8]) -> ApiResult<RegistrationInput> {
    let mut fields = WriteFields::parse(body)?;
    Ok(RegistrationInput {
        username: fields.take("username"),
        email: fields.take("email"),
        password: fields.take("password"),
        first_name: fields.take("first_name"),
        last_name: fields.take("last_name"),
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/users/",
    responses(
        (status = 200, description = "Empty collection carrying the registration template", body = Document, content_type = "application/vnd.collection+json")
    ),
    tags = ["users"],
    operation_id = "userTemplate",
    security([])
)]
#[get("/users/")]
pub async fn list_users(_caller: Caller, links: Links) -> HttpResponse {
    Collection::new(links.request())
        .template(&USER_TEMPLATE)
        .into_document()
        .ok()
}

/// Register a new user. Every field error is reported in one response.
#[utoipa::path(
    post,
    path = "/api/v1/users/",
    request_body(content = Document, description = "Template with username, email, password, first_name, last_name"),
    responses(
        (status = 201, description = "Registered", body = Document, content_type = "application/vnd.collection+json"),
        (status = 400, description = "Field errors keyed by field name", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users/")]
pub async fn register_user(
    state: web::Data<HttpState>,
    _caller: Caller,
    links: Links,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let input = registration_input(&body)?;
    let profile = state.accounts.register(input).await?;
    let location = links.user(profile.user.id());
    Ok(Collection::new(links.request())
        .item(user_item(&links, &profile))
        .into_document()
        .created(&location))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "The caller's own profile", body = Document, content_type = "application/vnd.collection+json"),
        (status = 401, description = "Not authenticated", body = ErrorSchema),
        (status = 403, description = "Another user's profile", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id:\\d+}/")]
pub async fn get_user(
    state: web::Data<HttpState>,
    caller: Caller,
    links: Links,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let profile = state
        .accounts
        .get_user(caller, UserId::new(path.into_inner()))
        .await?;
    Ok(Collection::new(links.request())
        .item(user_item(&links, &profile))
        .into_document()
        .ok())
}
