//! Recipe handlers.
//!
//! ```text
//! GET    /api/v1/                 list recipes (+ user link, search query, template)
//! POST   /api/v1/                 create the caller's recipe
//! GET    /api/v1/search/?name=    filtered list
//! GET    /api/v1/{id}/            retrieve (+ template)
//! PUT    /api/v1/{id}/            rename
//! DELETE /api/v1/{id}/            delete with ingredients and steps
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::ports::{RecipeInput, Submitted};
use crate::domain::{Caller, FILTER_PARAMS, Recipe, RecipeFilter, RecipeId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::collection::{Collection, Document, Item, WriteFields};
use crate::inbound::http::links::Links;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Fields accepted when creating or renaming a recipe.
pub const RECIPE_TEMPLATE: [&str; 1] = ["name"];

/// Render a recipe as a Collection+JSON item.
pub(crate) fn recipe_item(links: &Links, recipe: &Recipe) -> Item {
    Item::new(links.recipe(recipe.id))
        .datum("id", recipe.id.value())
        .datum("name", recipe.name.as_str())
        .datum("owner_username", recipe.owner_username.as_str())
        .link("ingredients", links.recipe_ingredients(recipe.id))
        .link("steps", links.recipe_steps(recipe.id))
        .link("owner", links.user(recipe.owner_id))
}

/// Read the write fields without failing; a malformed body is reported by
/// the command once the target and permission checks have passed.
fn recipe_input(body: &[u8]) -> Submitted<RecipeInput> {
    WriteFields::parse(body)
        .map(|mut fields| RecipeInput {
            name: fields.take("name"),
        })
        .into()
}

fn single(links: &Links, recipe: &Recipe) -> Collection {
    Collection::new(links.request()).item(recipe_item(links, recipe))
}

/// List every recipe in name order.
#[utoipa::path(
    get,
    path = "/api/v1/",
    responses(
        (status = 200, description = "Recipes", body = Document, content_type = "application/vnd.collection+json"),
        (status = 401, description = "Invalid token", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes"
)]
#[get("/")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    caller: Caller,
    links: Links,
) -> ApiResult<HttpResponse> {
    let recipes = state.recipes.list_recipes(&RecipeFilter::all()).await?;

    let mut collection = Collection::new(links.request())
        .items(recipes.iter().map(|recipe| recipe_item(&links, recipe)));
    if let Some(user_id) = caller.user_id() {
        collection = collection.link("user", links.user(user_id));
    }
    Ok(collection
        .search_query(links.search(), &FILTER_PARAMS)
        .template(&RECIPE_TEMPLATE)
        .into_document()
        .ok())
}

/// List recipes matching `owner_username`, `name`, `name_exact` and `id`.
#[utoipa::path(
    get,
    path = "/api/v1/search/",
    params(
        ("owner_username" = Option<String>, Query, description = "Exact owner username"),
        ("name" = Option<String>, Query, description = "Case-insensitive name fragment"),
        ("name_exact" = Option<String>, Query, description = "Exact name"),
        ("id" = Option<i64>, Query, description = "Recipe id")
    ),
    responses(
        (status = 200, description = "Matching recipes", body = Document, content_type = "application/vnd.collection+json"),
        (status = 400, description = "Malformed filter", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "searchRecipes"
)]
#[get("/search/")]
pub async fn search_recipes(
    state: web::Data<HttpState>,
    _caller: Caller,
    links: Links,
    query: web::Query<Vec<(String, String)>>,
) -> ApiResult<HttpResponse> {
    let filter = RecipeFilter::from_params(
        query
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str())),
    )?;
    let recipes = state.recipes.list_recipes(&filter).await?;
    Ok(Collection::new(links.request())
        .items(recipes.iter().map(|recipe| recipe_item(&links, recipe)))
        .into_document()
        .ok())
}

/// Create a recipe owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/",
    request_body(content = Document, description = "Template with `name`"),
    responses(
        (status = 201, description = "Created", body = Document, content_type = "application/vnd.collection+json"),
        (status = 400, description = "Invalid name or caller already owns a recipe", body = ErrorSchema),
        (status = 401, description = "Not authenticated", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe"
)]
#[post("/")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    caller: Caller,
    links: Links,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    caller.require_user()?;
    let input = recipe_input(&body);
    let recipe = state.recipe_commands.create_recipe(caller, input).await?;
    let location = links.recipe(recipe.id);
    Ok(single(&links, &recipe).into_document().created(&location))
}

#[utoipa::path(
    get,
    path = "/api/v1/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe", body = Document, content_type = "application/vnd.collection+json"),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe"
)]
#[get("/{id:\\d+}/")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    _caller: Caller,
    links: Links,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let recipe = state.recipes.get_recipe(RecipeId::new(path.into_inner())).await?;
    Ok(single(&links, &recipe)
        .template(&RECIPE_TEMPLATE)
        .into_document()
        .ok())
}

#[utoipa::path(
    put,
    path = "/api/v1/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body(content = Document, description = "Template with `name`"),
    responses(
        (status = 200, description = "Renamed", body = Document, content_type = "application/vnd.collection+json"),
        (status = 400, description = "Invalid name", body = ErrorSchema),
        (status = 401, description = "Not authenticated", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "updateRecipe"
)]
#[put("/{id:\\d+}/")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    caller: Caller,
    links: Links,
    path: web::Path<i64>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let input = recipe_input(&body);
    let recipe = state
        .recipe_commands
        .update_recipe(caller, RecipeId::new(path.into_inner()), input)
        .await?;
    Ok(single(&links, &recipe).into_document().ok())
}

#[utoipa::path(
    delete,
    path = "/api/v1/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Deleted together with ingredients and steps"),
        (status = 401, description = "Not authenticated", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe"
)]
#[delete("/{id:\\d+}/")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .recipe_commands
        .delete_recipe(caller, RecipeId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "recipes_tests.rs"]
mod tests;
