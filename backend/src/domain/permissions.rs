//! Per-request authorisation predicates.
//!
//! A [`Permission`] decides whether a [`Caller`] may perform an
//! [`Operation`] on an object. Authentication is checked before ownership,
//! so anonymous callers are told to authenticate rather than being
//! forbidden.

use super::{Error, Owned, RecipeChild, UserId};

/// Identity behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    User(UserId),
}

impl Caller {
    /// Authenticated user id, if any.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Anonymous => None,
            Self::User(id) => Some(*id),
        }
    }

    /// Authenticated user id or an unauthorised error.
    pub fn require_user(&self) -> Result<UserId, Error> {
        self.user_id().ok_or_else(not_authenticated)
    }
}

/// Kind of access being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Reads never mutate state.
    pub fn is_safe(self) -> bool {
        matches!(self, Self::Read)
    }
}

/// Why access was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Unauthenticated,
    NotOwner,
    NotSelf,
}

/// Outcome of a permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    /// Map a denial onto the domain error taxonomy.
    pub fn into_result(self) -> Result<(), Error> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(DenyReason::Unauthenticated) => Err(not_authenticated()),
            Self::Deny(DenyReason::NotOwner | DenyReason::NotSelf) => Err(Error::forbidden(
                "You do not have permission to perform this action.",
            )),
        }
    }
}

fn not_authenticated() -> Error {
    Error::unauthorized("Authentication credentials were not provided.")
}

/// Authorisation predicate over objects of type `T`.
pub trait Permission<T: ?Sized> {
    fn check(&self, caller: &Caller, object: &T, operation: Operation) -> Decision;
}

fn owner_or_read_only(caller: &Caller, owner: UserId, operation: Operation) -> Decision {
    if operation.is_safe() {
        return Decision::Allow;
    }
    match caller {
        Caller::Anonymous => Decision::Deny(DenyReason::Unauthenticated),
        Caller::User(id) if *id == owner => Decision::Allow,
        Caller::User(_) => Decision::Deny(DenyReason::NotOwner),
    }
}

/// Reads for everyone; writes only for the recorded owner.
#[derive(Debug, Default, Clone, Copy)]
pub struct OwnerOrReadOnly;

impl<T: Owned + ?Sized> Permission<T> for OwnerOrReadOnly {
    fn check(&self, caller: &Caller, object: &T, operation: Operation) -> Decision {
        owner_or_read_only(caller, object.owner_id(), operation)
    }
}

/// Owner-or-read-only for child records, resolved through the parent recipe.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecipeOwnerOrReadOnly;

impl<T: RecipeChild + ?Sized> Permission<T> for RecipeOwnerOrReadOnly {
    fn check(&self, caller: &Caller, object: &T, operation: Operation) -> Decision {
        owner_or_read_only(caller, object.recipe().owner_id, operation)
    }
}

/// Access only for the authenticated user the object identifies.
#[derive(Debug, Default, Clone, Copy)]
pub struct SelfOnly;

impl Permission<UserId> for SelfOnly {
    fn check(&self, caller: &Caller, object: &UserId, _operation: Operation) -> Decision {
        match caller {
            Caller::Anonymous => Decision::Deny(DenyReason::Unauthenticated),
            Caller::User(id) if id == object => Decision::Allow,
            Caller::User(_) => Decision::Deny(DenyReason::NotSelf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ErrorCode, Ingredient, IngredientId, ItemText, Recipe, RecipeId, RecipeName, Username,
    };
    use rstest::{fixture, rstest};

    const OWNER: UserId = UserId::new(1);
    const OTHER: UserId = UserId::new(2);

    #[fixture]
    fn recipe() -> Recipe {
        Recipe {
            id: RecipeId::new(10),
            name: RecipeName::new("recipe1").expect("valid name"),
            owner_id: OWNER,
            owner_username: Username::new("foo").expect("valid username"),
        }
    }

    #[fixture]
    fn ingredient(recipe: Recipe) -> Ingredient {
        Ingredient {
            id: IngredientId::new(5),
            text: ItemText::new("salt").expect("valid text"),
            recipe: recipe.reference(),
        }
    }

    #[rstest]
    #[case(Caller::Anonymous, Operation::Read, Decision::Allow)]
    #[case(Caller::User(OTHER), Operation::Read, Decision::Allow)]
    #[case(Caller::Anonymous, Operation::Update, Decision::Deny(DenyReason::Unauthenticated))]
    #[case(Caller::Anonymous, Operation::Create, Decision::Deny(DenyReason::Unauthenticated))]
    #[case(Caller::User(OTHER), Operation::Update, Decision::Deny(DenyReason::NotOwner))]
    #[case(Caller::User(OTHER), Operation::Delete, Decision::Deny(DenyReason::NotOwner))]
    #[case(Caller::User(OWNER), Operation::Update, Decision::Allow)]
    #[case(Caller::User(OWNER), Operation::Delete, Decision::Allow)]
    fn owner_or_read_only_matrix(
        recipe: Recipe,
        ingredient: Ingredient,
        #[case] caller: Caller,
        #[case] operation: Operation,
        #[case] expected: Decision,
    ) {
        assert_eq!(OwnerOrReadOnly.check(&caller, &recipe, operation), expected);
        assert_eq!(
            RecipeOwnerOrReadOnly.check(&caller, &ingredient, operation),
            expected
        );
    }

    #[rstest]
    #[case(Caller::Anonymous, Decision::Deny(DenyReason::Unauthenticated))]
    #[case(Caller::User(OTHER), Decision::Deny(DenyReason::NotSelf))]
    #[case(Caller::User(OWNER), Decision::Allow)]
    fn self_only_applies_to_reads_too(#[case] caller: Caller, #[case] expected: Decision) {
        assert_eq!(SelfOnly.check(&caller, &OWNER, Operation::Read), expected);
    }

    #[rstest]
    #[case(Decision::Deny(DenyReason::Unauthenticated), ErrorCode::Unauthorized)]
    #[case(Decision::Deny(DenyReason::NotOwner), ErrorCode::Forbidden)]
    #[case(Decision::Deny(DenyReason::NotSelf), ErrorCode::Forbidden)]
    fn denials_map_to_error_codes(#[case] decision: Decision, #[case] expected: ErrorCode) {
        let err = decision.into_result().expect_err("denied");
        assert_eq!(err.code(), expected);
    }

    #[rstest]
    fn require_user_rejects_anonymous() {
        let err = Caller::Anonymous.require_user().expect_err("anonymous");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(Caller::User(OWNER).require_user().ok(), Some(OWNER));
    }
}
