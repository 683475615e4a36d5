//! Ingredient handlers.
//!
//! ```text
//! GET    /api/v1/{recipe}/ingredients/   list (+ recipe link, template)
//! POST   /api/v1/{recipe}/ingredients/   add to a recipe the caller owns
//! GET    /api/v1/ingredients/{id}/       retrieve (+ template)
//! PUT    /api/v1/ingredients/{id}/       replace text
//! DELETE /api/v1/ingredients/{id}/       delete
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::ports::{ItemInput, Submitted};
use crate::domain::{Caller, Ingredient, IngredientId, RecipeId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::collection::{Collection, Document, Item, WriteFields};
use crate::inbound::http::links::Links;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Fields accepted when adding or editing an ingredient.
pub const INGREDIENT_TEMPLATE: [&str; 1] = ["text"];

pub(crate) fn ingredient_item(links: &Links, ingredient: &Ingredient) -> Item {
    Item::new(links.ingredient(ingredient.id))
        .datum("id", ingredient.id.value())
        .datum("text", ingredient.text.as_str())
        .link("recipe", links.recipe(ingredient.recipe.id))
}

/// Malformed bodies are left for the command to report.
fn ingredient_input(body: &[u8]) -> Submitted<ItemInput> {
    WriteFields::parse(body)
        .map(|mut fields| ItemInput {
            text: fields.take("text"),
        })
        .into()
}

#[utoipa::path(
    get,
    path = "/api/v1/{id}/ingredients/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Ingredients of the recipe", body = Document, content_type = "application/vnd.collection+json"),
        (status = 404, description = "Recipe not found", body = ErrorSchema)
    ),
    tags = ["ingredients"],
    operation_id = "listIngredients"
)]
#[get("/{id:\\d+}/ingredients/")]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    _caller: Caller,
    links: Links,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let (recipe, ingredients) = state
        .recipes
        .list_ingredients(RecipeId::new(path.into_inner()))
        .await?;
    Ok(Collection::new(links.request())
        .items(ingredients.iter().map(|item| ingredient_item(&links, item)))
        .link("recipe", links.recipe(recipe.id))
        .template(&INGREDIENT_TEMPLATE)
        .into_document()
        .ok())
}

#[utoipa::path(
    post,
    path = "/api/v1/{id}/ingredients/",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body(content = Document, description = "Template with `text`"),
    responses(
        (status = 201, description = "Created", body = Document, content_type = "application/vnd.collection+json"),
        (status = 400, description = "Invalid text", body = ErrorSchema),
        (status = 401, description = "Not authenticated", body = ErrorSchema),
        (status = 403, description = "Not the recipe owner", body = ErrorSchema),
        (status = 404, description = "Recipe not found", body = ErrorSchema)
    ),
    tags = ["ingredients"],
    operation_id = "createIngredient"
)]
#[post("/{id:\\d+}/ingredients/")]
pub async fn create_ingredient(
    state: web::Data<HttpState>,
    caller: Caller,
    links: Links,
    path: web::Path<i64>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let input = ingredient_input(&body);
    let ingredient = state
        .recipe_commands
        .create_ingredient(caller, RecipeId::new(path.into_inner()), input)
        .await?;
    let location = links.ingredient(ingredient.id);
    Ok(Collection::new(links.request())
        .item(ingredient_item(&links, &ingredient))
        .into_document()
        .created(&location))
}

#[utoipa::path(
    get,
    path = "/api/v1/ingredients/{id}/",
    params(("id" = i64, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Ingredient", body = Document, content_type = "application/vnd.collection+json"),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["ingredients"],
    operation_id = "getIngredient"
)]
#[get("/ingredients/{id:\\d+}/")]
pub async fn get_ingredient(
    state: web::Data<HttpState>,
    _caller: Caller,
    links: Links,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let ingredient = state
        .recipes
        .get_ingredient(IngredientId::new(path.into_inner()))
        .await?;
    Ok(Collection::new(links.request())
        .item(ingredient_item(&links, &ingredient))
        .template(&INGREDIENT_TEMPLATE)
        .into_document()
        .ok())
}

#[utoipa::path(
    put,
    path = "/api/v1/ingredients/{id}/",
    params(("id" = i64, Path, description = "Ingredient id")),
    request_body(content = Document, description = "Template with `text`"),
    responses(
        (status = 200, description = "Updated", body = Document, content_type = "application/vnd.collection+json"),
        (status = 400, description = "Invalid text", body = ErrorSchema),
        (status = 401, description = "Not authenticated", body = ErrorSchema),
        (status = 403, description = "Not the recipe owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["ingredients"],
    operation_id = "updateIngredient"
)]
#[put("/ingredients/{id:\\d+}/")]
pub async fn update_ingredient(
    state: web::Data<HttpState>,
    caller: Caller,
    links: Links,
    path: web::Path<i64>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let input = ingredient_input(&body);
    let ingredient = state
        .recipe_commands
        .update_ingredient(caller, IngredientId::new(path.into_inner()), input)
        .await?;
    Ok(Collection::new(links.request())
        .item(ingredient_item(&links, &ingredient))
        .into_document()
        .ok())
}

#[utoipa::path(
    delete,
    path = "/api/v1/ingredients/{id}/",
    params(("id" = i64, Path, description = "Ingredient id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Not authenticated", body = ErrorSchema),
        (status = 403, description = "Not the recipe owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["ingredients"],
    operation_id = "deleteIngredient"
)]
#[delete("/ingredients/{id:\\d+}/")]
pub async fn delete_ingredient(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .recipe_commands
        .delete_ingredient(caller, IngredientId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
