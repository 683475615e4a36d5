//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate
//! with `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered users. `username` and `email` are unique.
    users (id) {
        id -> Int8,
        username -> Varchar,
        email -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        first_name -> Varchar,
        last_name -> Varchar,
        created_at -> Timestamptz,
        /// Maintained by the `set_updated_at` trigger.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// One API token per user.
    auth_tokens (key) {
        key -> Varchar,
        user_id -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recipes; `owner_id` is unique so a user owns at most one.
    recipes (id) {
        id -> Int8,
        name -> Varchar,
        owner_id -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    ingredients (id) {
        id -> Int8,
        recipe_id -> Int8,
        text -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    steps (id) {
        id -> Int8,
        recipe_id -> Int8,
        step_text -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(auth_tokens -> users (user_id));
diesel::joinable!(recipes -> users (owner_id));
diesel::joinable!(ingredients -> recipes (recipe_id));
diesel::joinable!(steps -> recipes (recipe_id));

diesel::allow_tables_to_appear_in_same_query!(auth_tokens, ingredients, recipes, steps, users);
