//! Declarative recipe query filter.
//!
//! Request parameters translate into a list of [`FilterClause`] values that
//! are ANDed together. Adapters either evaluate the filter in memory with
//! [`RecipeFilter::matches`] or translate the clauses into SQL predicates.

use std::collections::BTreeMap;

use super::{Error, FieldErrors, Recipe, RecipeId};

/// Query parameter for an exact owner username match.
pub const PARAM_OWNER_USERNAME: &str = "owner_username";
/// Query parameter for a case-insensitive substring match on the name.
pub const PARAM_NAME: &str = "name";
/// Query parameter for an exact name match.
pub const PARAM_NAME_EXACT: &str = "name_exact";
/// Query parameter for an exact identifier match.
pub const PARAM_ID: &str = "id";

/// Every parameter the filter understands, in clause order.
pub const FILTER_PARAMS: [&str; 4] = [PARAM_OWNER_USERNAME, PARAM_NAME, PARAM_NAME_EXACT, PARAM_ID];

/// Recipe attribute a clause constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    OwnerUsername,
    Name,
    Id,
}

/// Comparison applied by a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Exact,
    IContains,
}

/// Value a clause compares against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Id(RecipeId),
}

/// One field/operator/value triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause {
    /// Attribute under test.
    pub field: FilterField,
    /// How the attribute is compared.
    pub lookup: Lookup,
    /// Operand of the comparison.
    pub value: FilterValue,
}

impl FilterClause {
    fn matches(&self, recipe: &Recipe) -> bool {
        match (&self.field, &self.lookup, &self.value) {
            (FilterField::Id, _, FilterValue::Id(id)) => recipe.id == *id,
            (FilterField::Name, lookup, FilterValue::Text(text)) => {
                compare(recipe.name.as_str(), *lookup, text)
            }
            (FilterField::OwnerUsername, lookup, FilterValue::Text(text)) => {
                compare(recipe.owner_username.as_str(), *lookup, text)
            }
            _ => false,
        }
    }
}

fn compare(candidate: &str, lookup: Lookup, needle: &str) -> bool {
    match lookup {
        Lookup::Exact => candidate == needle,
        Lookup::IContains => candidate.to_lowercase().contains(&needle.to_lowercase()),
    }
}

/// Conjunction of filter clauses. An empty filter matches every recipe.
///
/// # Examples
/// ```
/// use recipe_backend::domain::{FilterField, RecipeFilter};
///
/// let filter = RecipeFilter::from_params([("name", "soup"), ("page", "2")]).unwrap();
/// assert_eq!(filter.clauses().len(), 1);
/// assert_eq!(filter.clauses()[0].field, FilterField::Name);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    clauses: Vec<FilterClause>,
}

impl RecipeFilter {
    /// Filter that matches every recipe.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a filter from request parameters.
    ///
    /// Unknown parameters and empty values are ignored. When a parameter
    /// repeats, the last value wins.
    pub fn from_params<'a, I>(params: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let latest: BTreeMap<&str, &str> = params
            .into_iter()
            .filter(|(key, _)| FILTER_PARAMS.contains(key))
            .collect();

        let mut filter = Self::default();
        for key in FILTER_PARAMS {
            let Some(value) = latest.get(key).copied().filter(|v| !v.is_empty()) else {
                continue;
            };
            filter = match key {
                PARAM_OWNER_USERNAME => filter.owner_username(value),
                PARAM_NAME => filter.name_contains(value),
                PARAM_NAME_EXACT => filter.name_exact(value),
                _ => {
                    let id = value
                        .trim()
                        .parse::<i64>()
                        .map_err(|_| FieldErrors::single(PARAM_ID, "Enter a number."))?;
                    filter.id(RecipeId::new(id))
                }
            };
        }
        Ok(filter)
    }

    /// Require an exact owner username.
    pub fn owner_username(self, username: &str) -> Self {
        self.with(FilterField::OwnerUsername, Lookup::Exact, FilterValue::Text(username.to_owned()))
    }

    /// Require the name to contain `fragment`, ignoring case.
    pub fn name_contains(self, fragment: &str) -> Self {
        self.with(FilterField::Name, Lookup::IContains, FilterValue::Text(fragment.to_owned()))
    }

    /// Require an exact name.
    pub fn name_exact(self, name: &str) -> Self {
        self.with(FilterField::Name, Lookup::Exact, FilterValue::Text(name.to_owned()))
    }

    /// Require an exact identifier.
    pub fn id(self, id: RecipeId) -> Self {
        self.with(FilterField::Id, Lookup::Exact, FilterValue::Id(id))
    }

    fn with(mut self, field: FilterField, lookup: Lookup, value: FilterValue) -> Self {
        self.clauses.push(FilterClause {
            field,
            lookup,
            value,
        });
        self
    }

    /// Clauses in the order they were added.
    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    /// True when the filter matches every recipe.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Whether `recipe` satisfies every clause.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.clauses.iter().all(|clause| clause.matches(recipe))
    }
}
