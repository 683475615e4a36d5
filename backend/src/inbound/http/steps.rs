//! Step handlers.
//!
//! ```text
//! GET    /api/v1/{recipe}/steps/   list (+ recipe link, template)
//! POST   /api/v1/{recipe}/steps/   add to a recipe the caller owns
//! GET    /api/v1/steps/{id}/       retrieve (+ template)
//! PUT    /api/v1/steps/{id}/       replace step_text
//! DELETE /api/v1/steps/{id}/       delete
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::ports::{ItemInput, Submitted};
use crate::domain::{Caller, RecipeId, Step, StepId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::collection::{Collection, Document, Item, WriteFields};
use crate::inbound::http::links::Links;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Fields accepted when adding or editing a step.
pub const STEP_TEMPLATE: [&str; 1] = ["step_text"];

pub(crate) fn step_item(links: &Links, step: &Step) -> Item {
    Item::new(links.step(step.id))
        .datum("id", step.id.value())
        .datum("step_text", step.step_text.as_str())
        .link("recipe", links.recipe(step.recipe.id))
}

fn step_input(body: &[u8]) -> Submitted<ItemInput> {
    WriteFields::parse(body)
        .map(|mut fields| ItemInput {
            text: fields.take("step_text"),
        })
        .into()
}

#[utoipa::path(
    get,
    path = "/api/v1/{id}/steps/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Steps of the recipe", body = Document, content_type = "application/vnd.collection+json"),
        (status = 404, description = "Recipe not found", body = ErrorSchema)
    ),
    tags = ["steps"],
    operation_id = "listSteps"
)]
#[get("/{id:\\d+}/steps/")]
pub async fn list_steps(
    state: web::Data<HttpState>,
    _caller: Caller,
    links: Links,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let (recipe, steps) = state
        .recipes
        .list_steps(RecipeId::new(path.into_inner()))
        .await?;
    Ok(Collection::new(links.request())
        .items(steps.iter().map(|item| step_item(&links, item)))
        .link("recipe", links.recipe(recipe.id))
        .template(&STEP_TEMPLATE)
        .into_document()
        .ok())
}

#[utoipa::path(
    post,
    path = "/api/v1/{id}/steps/",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body(content = Document, description = "Template with `step_text`"),
    responses(
        (status = 201, description = "Created", body = Document, content_type = "application/vnd.collection+json"),
        (status = 400, description = "Invalid step_text", body = ErrorSchema),
        (status = 401, description = "Not authenticated", body = ErrorSchema),
        (status = 403, description = "Not the recipe owner", body = ErrorSchema),
        (status = 404, description = "Recipe not found", body = ErrorSchema)
    ),
    tags = ["steps"],
    operation_id = "createStep"
)]
#[post("/{id:\\d+}/steps/")]
pub async fn create_step(
    state: web::Data<HttpState>,
    caller: Caller,
    links: Links,
    path: web::Path<i64>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let input = step_input(&body);
    let step = state
        .recipe_commands
        .create_step(caller, RecipeId::new(path.into_inner()), input)
        .await?;
    let location = links.step(step.id);
    Ok(Collection::new(links.request())
        .item(step_item(&links, &step))
        .into_document()
        .created(&location))
}

#[utoipa::path(
    get,
    path = "/api/v1/steps/{id}/",
    params(("id" = i64, Path, description = "Step id")),
    responses(
        (status = 200, description = "Step", body = Document, content_type = "application/vnd.collection+json"),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["steps"],
    operation_id = "getStep"
)]
#[get("/steps/{id:\\d+}/")]
pub async fn get_step(
    state: web::Data<HttpState>,
    _caller: Caller,
    links: Links,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let step = state
        .recipes
        .get_step(StepId::new(path.into_inner()))
        .await?;
    Ok(Collection::new(links.request())
        .item(step_item(&links, &step))
        .template(&STEP_TEMPLATE)
        .into_document()
        .ok())
}

#[utoipa::path(
    put,
    path = "/api/v1/steps/{id}/",
    params(("id" = i64, Path, description = "Step id")),
    request_body(content = Document, description = "Template with `step_text`"),
    responses(
        (status = 200, description = "Updated", body = Document, content_type = "application/vnd.collection+json"),
        (status = 400, description = "Invalid step_text", body = ErrorSchema),
        (status = 401, description = "Not authenticated", body = ErrorSchema),
        (status = 403, description = "Not the recipe owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["steps"],
    operation_id = "updateStep"
)]
#[put("/steps/{id:\\d+}/")]
pub async fn update_step(
    state: web::Data<HttpState>,
    caller: Caller,
    links: Links,
    path: web::Path<i64>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let input = step_input(&body);
    let step = state
        .recipe_commands
        .update_step(caller, StepId::new(path.into_inner()), input)
        .await?;
    Ok(Collection::new(links.request())
        .item(step_item(&links, &step))
        .into_document()
        .ok())
}

#[utoipa::path(
    delete,
    path = "/api/v1/steps/{id}/",
    params(("id" = i64, Path, description = "Step id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Not authenticated", body = ErrorSchema),
        (status = 403, description = "Not the recipe owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["steps"],
    operation_id = "deleteStep"
)]
#[delete("/steps/{id:\\d+}/")]
pub async fn delete_step(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .recipe_commands
        .delete_step(caller, StepId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
