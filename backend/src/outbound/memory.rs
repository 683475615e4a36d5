//! In-process adapters for every driven port.
//!
//! [`InMemoryStore`] backs the server when no database URL is configured
//! and gives handler and behaviour tests a real store to run against. All
//! maps live behind one mutex, so each port call is atomic and a recipe
//! delete removes its children under the same lock.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    AuthTokenRepository, IngredientRepository, NewUserRecord, RecipePersistenceError,
    RecipeRepository, StepRepository, StoredCredentials, TokenPersistenceError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuthToken, EmailAddress, Ingredient, IngredientId, ItemText, PasswordHash, Recipe,
    RecipeFilter, RecipeId, RecipeName, RecipeRef, Step, StepId, User, UserId, Username,
};

struct UserEntry {
    user: User,
    password_hash: PasswordHash,
}

struct RecipeEntry {
    name: RecipeName,
    owner_id: UserId,
}

#[derive(Default)]
struct State {
    last_id: i64,
    users: BTreeMap<UserId, UserEntry>,
    tokens: HashMap<UserId, AuthToken>,
    recipes: BTreeMap<RecipeId, RecipeEntry>,
    ingredients: BTreeMap<IngredientId, Ingredient>,
    steps: BTreeMap<StepId, Step>,
}

impl State {
    /// Identifiers are unique across tables, which keeps test fixtures
    /// from confusing a recipe id with a step id.
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn recipe(&self, id: RecipeId) -> Option<Recipe> {
        let entry = self.recipes.get(&id)?;
        let owner = self.users.get(&entry.owner_id)?;
        Some(Recipe {
            id,
            name: entry.name.clone(),
            owner_id: entry.owner_id,
            owner_username: owner.user.username().clone(),
        })
    }
}

/// Mutex-guarded store implementing the user, token, recipe, ingredient
/// and step repositories.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// An empty store; identifiers start at 1.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, String> {
        self.state
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }

    fn recipes(&self) -> Result<MutexGuard<'_, State>, RecipePersistenceError> {
        self.lock().map_err(RecipePersistenceError::query)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &NewUserRecord) -> Result<User, UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        let existing = state.users.values().map(|entry| &entry.user);
        for other in existing {
            if other.username() == &user.username {
                return Err(UserPersistenceError::duplicate_username());
            }
            if other.email() == &user.email {
                return Err(UserPersistenceError::duplicate_email());
            }
        }

        let id = UserId::new(state.next_id());
        let created = User::new(
            id,
            user.username.clone(),
            user.email.clone(),
            user.first_name.clone(),
            user.last_name.clone(),
        );
        state.users.insert(
            id,
            UserEntry {
                user: created.clone(),
                password_hash: user.password_hash.clone(),
            },
        );
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state.users.get(&id).map(|entry| entry.user.clone()))
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state
            .users
            .values()
            .find(|entry| entry.user.username().as_str() == username)
            .map(|entry| StoredCredentials {
                user_id: entry.user.id(),
                password_hash: entry.password_hash.clone(),
            }))
    }

    async fn username_taken(&self, username: &Username) -> Result<bool, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state
            .users
            .values()
            .any(|entry| entry.user.username() == username))
    }

    async fn email_taken(&self, email: &EmailAddress) -> Result<bool, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state.users.values().any(|entry| entry.user.email() == email))
    }
}

#[async_trait]
impl AuthTokenRepository for InMemoryStore {
    async fn find_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<AuthToken>, TokenPersistenceError> {
        let state = self.lock().map_err(TokenPersistenceError::query)?;
        Ok(state.tokens.get(&user_id).cloned())
    }

    async fn insert_for_user(
        &self,
        user_id: UserId,
        token: &AuthToken,
    ) -> Result<AuthToken, TokenPersistenceError> {
        let mut state = self.lock().map_err(TokenPersistenceError::query)?;
        Ok(state
            .tokens
            .entry(user_id)
            .or_insert_with(|| token.clone())
            .clone())
    }

    async fn find_user(&self, token: &AuthToken) -> Result<Option<UserId>, TokenPersistenceError> {
        let state = self.lock().map_err(TokenPersistenceError::query)?;
        Ok(state
            .tokens
            .iter()
            .find(|(_, stored)| *stored == token)
            .map(|(user_id, _)| *user_id))
    }
}

#[async_trait]
impl RecipeRepository for InMemoryStore {
    async fn list(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>, RecipePersistenceError> {
        let state = self.recipes()?;
        let mut recipes: Vec<Recipe> = state
            .recipes
            .keys()
            .filter_map(|id| state.recipe(*id))
            .filter(|recipe| filter.matches(recipe))
            .collect();
        recipes.sort_by_cached_key(|recipe| {
            (
                recipe.name.as_str().to_lowercase(),
                recipe.name.as_str().to_owned(),
                recipe.id,
            )
        });
        Ok(recipes)
    }

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, RecipePersistenceError> {
        Ok(self.recipes()?.recipe(id))
    }

    async fn find_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Option<Recipe>, RecipePersistenceError> {
        let state = self.recipes()?;
        Ok(state
            .recipes
            .iter()
            .find(|(_, entry)| entry.owner_id == owner)
            .and_then(|(id, _)| state.recipe(*id)))
    }

    async fn create(
        &self,
        owner: UserId,
        name: &RecipeName,
    ) -> Result<Recipe, RecipePersistenceError> {
        let mut state = self.recipes()?;
        if state.recipes.values().any(|entry| entry.owner_id == owner) {
            return Err(RecipePersistenceError::duplicate_owner());
        }
        if !state.users.contains_key(&owner) {
            return Err(RecipePersistenceError::query(format!(
                "owner {owner} does not exist"
            )));
        }

        let id = RecipeId::new(state.next_id());
        state.recipes.insert(
            id,
            RecipeEntry {
                name: name.clone(),
                owner_id: owner,
            },
        );
        state
            .recipe(id)
            .ok_or_else(|| RecipePersistenceError::query("inserted recipe vanished"))
    }

    async fn rename(
        &self,
        id: RecipeId,
        name: &RecipeName,
    ) -> Result<Option<Recipe>, RecipePersistenceError> {
        let mut state = self.recipes()?;
        let Some(entry) = state.recipes.get_mut(&id) else {
            return Ok(None);
        };
        entry.name = name.clone();
        Ok(state.recipe(id))
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipePersistenceError> {
        let mut state = self.recipes()?;
        if state.recipes.remove(&id).is_none() {
            return Ok(false);
        }
        state
            .ingredients
            .retain(|_, ingredient| ingredient.recipe.id != id);
        state.steps.retain(|_, step| step.recipe.id != id);
        Ok(true)
    }
}

/// Whether `recipe` still exists; children may only attach to live parents.
fn require_parent(state: &State, recipe: &RecipeRef) -> Result<(), RecipePersistenceError> {
    if state.recipes.contains_key(&recipe.id) {
        Ok(())
    } else {
        Err(RecipePersistenceError::query(format!(
            "recipe {} does not exist",
            recipe.id
        )))
    }
}

#[async_trait]
impl IngredientRepository for InMemoryStore {
    async fn list_for_recipe(
        &self,
        recipe: RecipeId,
    ) -> Result<Vec<Ingredient>, RecipePersistenceError> {
        let state = self.recipes()?;
        Ok(state
            .ingredients
            .values()
            .filter(|ingredient| ingredient.recipe.id == recipe)
            .cloned()
            .collect())
    }

    async fn find_by_id(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, RecipePersistenceError> {
        Ok(self.recipes()?.ingredients.get(&id).cloned())
    }

    async fn create(
        &self,
        recipe: &RecipeRef,
        text: &ItemText,
    ) -> Result<Ingredient, RecipePersistenceError> {
        let mut state = self.recipes()?;
        require_parent(&state, recipe)?;
        let ingredient = Ingredient {
            id: IngredientId::new(state.next_id()),
            text: text.clone(),
            recipe: *recipe,
        };
        state.ingredients.insert(ingredient.id, ingredient.clone());
        Ok(ingredient)
    }

    async fn update(
        &self,
        id: IngredientId,
        text: &ItemText,
    ) -> Result<Option<Ingredient>, RecipePersistenceError> {
        let mut state = self.recipes()?;
        Ok(state.ingredients.get_mut(&id).map(|ingredient| {
            ingredient.text = text.clone();
            ingredient.clone()
        }))
    }

    async fn delete(&self, id: IngredientId) -> Result<bool, RecipePersistenceError> {
        Ok(self.recipes()?.ingredients.remove(&id).is_some())
    }
}

#[async_trait]
impl StepRepository for InMemoryStore {
    async fn list_for_recipe(&self, recipe: RecipeId) -> Result<Vec<Step>, RecipePersistenceError> {
        let state = self.recipes()?;
        Ok(state
            .steps
            .values()
            .filter(|step| step.recipe.id == recipe)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: StepId) -> Result<Option<Step>, RecipePersistenceError> {
        Ok(self.recipes()?.steps.get(&id).cloned())
    }

    async fn create(
        &self,
        recipe: &RecipeRef,
        text: &ItemText,
    ) -> Result<Step, RecipePersistenceError> {
        let mut state = self.recipes()?;
        require_parent(&state, recipe)?;
        let step = Step {
            id: StepId::new(state.next_id()),
            step_text: text.clone(),
            recipe: *recipe,
        };
        state.steps.insert(step.id, step.clone());
        Ok(step)
    }

    async fn update(
        &self,
        id: StepId,
        text: &ItemText,
    ) -> Result<Option<Step>, RecipePersistenceError> {
        let mut state = self.recipes()?;
        Ok(state.steps.get_mut(&id).map(|step| {
            step.step_text = text.clone();
            step.clone()
        }))
    }

    async fn delete(&self, id: StepId) -> Result<bool, RecipePersistenceError> {
        Ok(self.recipes()?.steps.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PersonName;
    use rstest::{fixture, rstest};

    fn record(username: &str) -> NewUserRecord {
        NewUserRecord {
            username: Username::new(username).expect("valid username"),
            email: EmailAddress::new(format!("{username}@example.com")).expect("valid email"),
            password_hash: PasswordHash::from_stored("$argon2id$stub"),
            first_name: PersonName::default(),
            last_name: PersonName::default(),
        }
    }

    fn name(raw: &str) -> RecipeName {
        RecipeName::new(raw).expect("valid name")
    }

    fn text(raw: &str) -> ItemText {
        ItemText::new(raw).expect("valid text")
    }

    #[fixture]
    fn store() -> InMemoryStore {
        InMemoryStore::new()
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_username_is_rejected(store: InMemoryStore) {
        UserRepository::create(&store, &record("foo")).await.expect("first user");
        let err = UserRepository::create(&store, &record("foo"))
            .await
            .expect_err("duplicate");
        assert_eq!(err, UserPersistenceError::duplicate_username());
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_is_rejected(store: InMemoryStore) {
        UserRepository::create(&store, &record("foo")).await.expect("first user");
        let mut other = record("bar");
        other.email = EmailAddress::new("foo@example.com").expect("valid email");
        let err = UserRepository::create(&store, &other)
            .await
            .expect_err("duplicate");
        assert_eq!(err, UserPersistenceError::duplicate_email());
    }

    #[rstest]
    #[tokio::test]
    async fn second_recipe_for_owner_is_rejected(store: InMemoryStore) {
        let owner = UserRepository::create(&store, &record("foo")).await.expect("user");
        RecipeRepository::create(&store, owner.id(), &name("recipe1"))
            .await
            .expect("first recipe");
        let err = RecipeRepository::create(&store, owner.id(), &name("recipe2"))
            .await
            .expect_err("second recipe");
        assert_eq!(err, RecipePersistenceError::duplicate_owner());
    }

    #[rstest]
    #[tokio::test]
    async fn list_orders_by_name_then_id(store: InMemoryStore) {
        for (user, recipe) in [
            ("a", "soup"),
            ("b", "apple pie"),
            ("c", "soup"),
            ("d", "Zebra cake"),
            ("e", "Banana bread"),
        ] {
            let owner = UserRepository::create(&store, &record(user)).await.expect("user");
            RecipeRepository::create(&store, owner.id(), &name(recipe))
                .await
                .expect("recipe");
        }

        let listed = RecipeRepository::list(&store, &RecipeFilter::all())
            .await
            .expect("list");
        let owners: Vec<&str> = listed.iter().map(|r| r.owner_username.as_str()).collect();
        assert_eq!(owners, ["b", "e", "a", "c", "d"]);

        let soups = RecipeRepository::list(&store, &RecipeFilter::all().name_contains("SOUP"))
            .await
            .expect("filtered list");
        assert_eq!(soups.len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_recipe_removes_children(store: InMemoryStore) {
        let owner = UserRepository::create(&store, &record("foo")).await.expect("user");
        let recipe = RecipeRepository::create(&store, owner.id(), &name("recipe1"))
            .await
            .expect("recipe");
        let parent = recipe.reference();
        IngredientRepository::create(&store, &parent, &text("flour"))
            .await
            .expect("ingredient");
        StepRepository::create(&store, &parent, &text("mix"))
            .await
            .expect("step");

        assert!(RecipeRepository::delete(&store, recipe.id).await.expect("delete"));

        let ingredients = IngredientRepository::list_for_recipe(&store, recipe.id)
            .await
            .expect("ingredients");
        let steps = StepRepository::list_for_recipe(&store, recipe.id)
            .await
            .expect("steps");
        assert!(ingredients.is_empty());
        assert!(steps.is_empty());
        assert!(!RecipeRepository::delete(&store, recipe.id).await.expect("delete"));
    }

    #[rstest]
    #[tokio::test]
    async fn token_insert_keeps_first_token(store: InMemoryStore) {
        let user = UserId::new(1);
        let first = AuthToken::generate();
        let stored = store
            .insert_for_user(user, &first)
            .await
            .expect("first insert");
        let again = store
            .insert_for_user(user, &AuthToken::generate())
            .await
            .expect("second insert");

        assert_eq!(stored, first);
        assert_eq!(again, first);
        assert_eq!(store.find_user(&first).await.expect("lookup"), Some(user));
    }

    #[rstest]
    #[tokio::test]
    async fn update_of_missing_child_is_none(store: InMemoryStore) {
        let updated = IngredientRepository::update(&store, IngredientId::new(99), &text("salt"))
            .await
            .expect("update");
        assert!(updated.is_none());
    }
}
