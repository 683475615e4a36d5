//! Tests for the recipe service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockIngredientRepository, MockRecipeRepository, MockStepRepository};
use crate::domain::{ErrorCode, RecipeRef, UserId, Username};
use rstest::{fixture, rstest};
use serde_json::json;

const OWNER: UserId = UserId::new(1);
const OTHER: UserId = UserId::new(2);

type TestService = RecipeService<MockRecipeRepository, MockIngredientRepository, MockStepRepository>;

fn make_service(
    recipes: MockRecipeRepository,
    ingredients: MockIngredientRepository,
    steps: MockStepRepository,
) -> TestService {
    RecipeService::new(Arc::new(recipes), Arc::new(ingredients), Arc::new(steps))
}

fn recipes_only(recipes: MockRecipeRepository) -> TestService {
    make_service(
        recipes,
        MockIngredientRepository::new(),
        MockStepRepository::new(),
    )
}

#[fixture]
fn recipe() -> Recipe {
    Recipe {
        id: RecipeId::new(10),
        name: RecipeName::new("recipe1").expect("valid name"),
        owner_id: OWNER,
        owner_username: Username::new("foo").expect("valid username"),
    }
}

fn ingredient(parent: RecipeRef) -> Ingredient {
    Ingredient {
        id: IngredientId::new(3),
        text: ItemText::new("salt").expect("valid text"),
        recipe: parent,
    }
}

fn named(name: &str) -> Submitted<RecipeInput> {
    Submitted::Fields(RecipeInput {
        name: Some(name.to_owned()),
    })
}

fn malformed() -> Error {
    Error::invalid_request("JSON parse error - expected value at line 1 column 2")
}

#[rstest]
#[tokio::test]
async fn create_recipe_requires_authentication() {
    let service = recipes_only(MockRecipeRepository::new());

    let err = service
        .create_recipe(Caller::Anonymous, named("soup"))
        .await
        .expect_err("anonymous callers cannot create");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn create_recipe_reports_missing_name() {
    let service = recipes_only(MockRecipeRepository::new());

    let err = service
        .create_recipe(Caller::User(OWNER), Submitted::Fields(RecipeInput::default()))
        .await
        .expect_err("name is required");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.details(), Some(&json!({"name": ["This field is required."]})));
}

#[rstest]
#[tokio::test]
async fn create_recipe_rejects_second_recipe_for_owner(recipe: Recipe) {
    let mut recipes = MockRecipeRepository::new();
    recipes
        .expect_find_by_owner()
        .times(1)
        .return_once(move |_| Ok(Some(recipe)));
    recipes.expect_create().never();

    let err = recipes_only(recipes)
        .create_recipe(Caller::User(OWNER), named("another_recipe"))
        .await
        .expect_err("one recipe per owner");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details(),
        Some(&json!({"non_field_errors": [ONE_RECIPE_PER_OWNER]}))
    );
}

#[rstest]
#[tokio::test]
async fn create_recipe_maps_store_race_to_validation_error() {
    let mut recipes = MockRecipeRepository::new();
    recipes.expect_find_by_owner().return_once(|_| Ok(None));
    recipes
        .expect_create()
        .return_once(|_, _| Err(RecipePersistenceError::duplicate_owner()));

    let err = recipes_only(recipes)
        .create_recipe(Caller::User(OWNER), named("soup"))
        .await
        .expect_err("unique violation");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn create_recipe_assigns_caller_as_owner(recipe: Recipe) {
    let mut recipes = MockRecipeRepository::new();
    recipes.expect_find_by_owner().return_once(|_| Ok(None));
    recipes
        .expect_create()
        .withf(|owner, name| *owner == OWNER && name.as_str() == "recipe1")
        .times(1)
        .return_once(move |_, _| Ok(recipe));

    let created = recipes_only(recipes)
        .create_recipe(Caller::User(OWNER), named("  recipe1 "))
        .await
        .expect("creation succeeds");
    assert_eq!(created.owner_id, OWNER);
}

#[rstest]
#[case(Caller::Anonymous, ErrorCode::Unauthorized)]
#[case(Caller::User(OTHER), ErrorCode::Forbidden)]
#[tokio::test]
async fn update_recipe_is_owner_only(
    recipe: Recipe,
    #[case] caller: Caller,
    #[case] expected: ErrorCode,
) {
    let mut recipes = MockRecipeRepository::new();
    recipes
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(recipe)));
    recipes.expect_rename().never();

    let err = recipes_only(recipes)
        .update_recipe(caller, RecipeId::new(10), named("another_recipe"))
        .await
        .expect_err("non-owners are rejected");
    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn permission_is_checked_before_validation(recipe: Recipe) {
    let mut recipes = MockRecipeRepository::new();
    recipes
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(recipe)));

    let err = recipes_only(recipes)
        .update_recipe(Caller::User(OTHER), RecipeId::new(10), Submitted::Fields(RecipeInput::default()))
        .await
        .expect_err("forbidden wins over invalid payload");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case(Caller::Anonymous, ErrorCode::Unauthorized)]
#[case(Caller::User(OTHER), ErrorCode::Forbidden)]
#[case(Caller::User(OWNER), ErrorCode::InvalidRequest)]
#[tokio::test]
async fn unreadable_payload_is_reported_after_permission(
    recipe: Recipe,
    #[case] caller: Caller,
    #[case] expected: ErrorCode,
) {
    let mut recipes = MockRecipeRepository::new();
    recipes
        .expect_find_by_id()
        .returning(move |_| Ok(Some(recipe.clone())));
    recipes.expect_rename().never();
    let mut steps = MockStepRepository::new();
    steps.expect_create().never();
    let service = make_service(recipes, MockIngredientRepository::new(), steps);

    let err = service
        .update_recipe(caller, RecipeId::new(10), Submitted::Malformed(malformed()))
        .await
        .expect_err("recipe update fails");
    assert_eq!(err.code(), expected);

    let err = service
        .create_step(caller, RecipeId::new(10), Submitted::Malformed(malformed()))
        .await
        .expect_err("step creation fails");
    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn unreadable_payload_for_missing_recipe_is_not_found() {
    let mut recipes = MockRecipeRepository::new();
    recipes.expect_find_by_id().returning(|_| Ok(None));

    let err = recipes_only(recipes)
        .update_recipe(
            Caller::Anonymous,
            RecipeId::new(99),
            Submitted::Malformed(malformed()),
        )
        .await
        .expect_err("no such recipe");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn missing_recipe_is_not_found_for_everyone() {
    let mut recipes = MockRecipeRepository::new();
    recipes.expect_find_by_id().returning(|_| Ok(None));
    let service = recipes_only(recipes);

    for caller in [Caller::Anonymous, Caller::User(OWNER)] {
        let err = service
            .delete_recipe(caller, RecipeId::new(99))
            .await
            .expect_err("no such recipe");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}

#[rstest]
#[tokio::test]
async fn owner_can_delete_recipe(recipe: Recipe) {
    let mut recipes = MockRecipeRepository::new();
    recipes
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(recipe)));
    recipes
        .expect_delete()
        .withf(|id| *id == RecipeId::new(10))
        .times(1)
        .return_once(|_| Ok(true));

    recipes_only(recipes)
        .delete_recipe(Caller::User(OWNER), RecipeId::new(10))
        .await
        .expect("owner deletes");
}

#[rstest]
#[case(Caller::Anonymous, ErrorCode::Unauthorized)]
#[case(Caller::User(OTHER), ErrorCode::Forbidden)]
#[tokio::test]
async fn create_ingredient_checks_parent_ownership(
    recipe: Recipe,
    #[case] caller: Caller,
    #[case] expected: ErrorCode,
) {
    let mut recipes = MockRecipeRepository::new();
    recipes
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(recipe)));
    let mut ingredients = MockIngredientRepository::new();
    ingredients.expect_create().never();

    let err = make_service(recipes, ingredients, MockStepRepository::new())
        .create_ingredient(
            caller,
            RecipeId::new(10),
            Submitted::Fields(ItemInput {
                text: Some("salt".to_owned()),
            }),
        )
        .await
        .expect_err("only the recipe owner adds ingredients");
    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn create_step_reports_step_text_field(recipe: Recipe) {
    let mut recipes = MockRecipeRepository::new();
    recipes
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(recipe)));

    let err = make_service(recipes, MockIngredientRepository::new(), MockStepRepository::new())
        .create_step(Caller::User(OWNER), RecipeId::new(10), Submitted::Fields(ItemInput { text: None }))
        .await
        .expect_err("text is required");
    assert_eq!(
        err.details(),
        Some(&json!({"step_text": ["This field is required."]}))
    );
}

#[rstest]
#[tokio::test]
async fn update_ingredient_walks_to_recipe_owner(recipe: Recipe) {
    let existing = ingredient(recipe.reference());
    let mut ingredients = MockIngredientRepository::new();
    ingredients
        .expect_find_by_id()
        .returning(move |_| Ok(Some(existing.clone())));
    ingredients
        .expect_update()
        .times(1)
        .returning(|id, text| {
            Ok(Some(Ingredient {
                id,
                text: text.clone(),
                recipe: RecipeRef {
                    id: RecipeId::new(10),
                    owner_id: OWNER,
                },
            }))
        });
    let service = make_service(
        MockRecipeRepository::new(),
        ingredients,
        MockStepRepository::new(),
    );
    let input = Submitted::Fields(ItemInput {
        text: Some("pepper".to_owned()),
    });

    let err = service
        .update_ingredient(Caller::User(OTHER), IngredientId::new(3), input.clone())
        .await
        .expect_err("other users are forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);

    let updated = service
        .update_ingredient(Caller::User(OWNER), IngredientId::new(3), input)
        .await
        .expect("owner updates");
    assert_eq!(updated.text.as_str(), "pepper");
}

#[rstest]
#[tokio::test]
async fn list_ingredients_requires_existing_recipe() {
    let mut recipes = MockRecipeRepository::new();
    recipes.expect_find_by_id().return_once(|_| Ok(None));
    let mut ingredients = MockIngredientRepository::new();
    ingredients.expect_list_for_recipe().never();

    let err = make_service(recipes, ingredients, MockStepRepository::new())
        .list_ingredients(RecipeId::new(42))
        .await
        .expect_err("parent must exist");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(RecipePersistenceError::connection("pool closed"), ErrorCode::ServiceUnavailable)]
#[case(RecipePersistenceError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn repository_failures_map_to_error_codes(
    #[case] failure: RecipePersistenceError,
    #[case] expected: ErrorCode,
) {
    let mut recipes = MockRecipeRepository::new();
    recipes.expect_list().return_once(move |_| Err(failure));

    let err = recipes_only(recipes)
        .list_recipes(&RecipeFilter::all())
        .await
        .expect_err("store failure");
    assert_eq!(err.code(), expected);
}
