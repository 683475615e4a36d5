//! Recipe aggregate: recipes and their ingredients and steps.
//!
//! Child records carry a [`RecipeRef`] naming their parent recipe and its
//! owner so permission checks can walk child -> recipe -> owner without a
//! second lookup.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::validation::{FieldError, at_most, required_text};
use super::{UserId, Username};

/// Maximum length of a recipe name.
pub const RECIPE_NAME_MAX: usize = 100;

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a store-assigned identifier.
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Raw integer value.
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

integer_id!(
    /// Recipe identifier.
    RecipeId
);
integer_id!(
    /// Ingredient identifier.
    IngredientId
);
integer_id!(
    /// Step identifier.
    StepId
);

/// Non-blank recipe name of at most 100 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecipeName(String);

impl RecipeName {
    /// Validate an optional raw value, trimming surrounding whitespace.
    pub fn parse(raw: Option<&str>) -> Result<Self, FieldError> {
        Ok(Self(at_most(required_text(raw)?, RECIPE_NAME_MAX)?))
    }

    /// Validate a name supplied directly.
    pub fn new(raw: impl Into<String>) -> Result<Self, FieldError> {
        Self::parse(Some(&raw.into()))
    }

    /// Borrow the trimmed value.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RecipeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free text of an ingredient or step; required and non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemText(String);

impl ItemText {
    /// Validate an optional raw value, trimming surrounding whitespace.
    pub fn parse(raw: Option<&str>) -> Result<Self, FieldError> {
        Ok(Self(required_text(raw)?))
    }

    /// Validate text supplied directly.
    pub fn new(raw: impl Into<String>) -> Result<Self, FieldError> {
        Self::parse(Some(&raw.into()))
    }

    /// Borrow the trimmed value.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A recipe owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: RecipeName,
    pub owner_id: UserId,
    pub owner_username: Username,
}

impl Recipe {
    /// Reference used by child records.
    pub fn reference(&self) -> RecipeRef {
        RecipeRef {
            id: self.id,
            owner_id: self.owner_id,
        }
    }
}

/// Parent recipe of an ingredient or step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeRef {
    pub id: RecipeId,
    pub owner_id: UserId,
}

/// Ingredient line of a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: IngredientId,
    pub text: ItemText,
    pub recipe: RecipeRef,
}

/// Preparation step of a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub id: StepId,
    pub step_text: ItemText,
    pub recipe: RecipeRef,
}

/// Records that have a single owning user.
pub trait Owned {
    fn owner_id(&self) -> UserId;
}

impl Owned for Recipe {
    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

impl Owned for RecipeRef {
    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

/// Records that belong to a parent recipe.
pub trait RecipeChild {
    fn recipe(&self) -> &RecipeRef;
}

impl RecipeChild for Ingredient {
    fn recipe(&self) -> &RecipeRef {
        &self.recipe
    }
}

impl RecipeChild for Step {
    fn recipe(&self) -> &RecipeRef {
        &self.recipe
    }
}
