//! User data model.
//!
//! Users are created through registration only. Passwords never leave the
//! registration path in clear text: [`NewUser`] carries a zeroized
//! [`Password`] that services hash before persistence.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::FieldErrors;
use super::validation::{FieldError, at_most, required_text};

/// Maximum length of a username.
pub const USERNAME_MAX: usize = 50;
/// Maximum length of an email address.
pub const EMAIL_MAX: usize = 254;
/// Minimum length of a password.
pub const PASSWORD_MIN: usize = 6;
/// Maximum length of a password.
pub const PASSWORD_MAX: usize = 100;
/// Maximum length of a first or last name.
pub const PERSON_NAME_MAX: usize = 150;

/// Stable user identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a store-assigned identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw integer value.
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        Regex::new(r"^[\w.@+-]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Login name: 1..=50 characters of letters, digits and `@.+-_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(raw: impl Into<String>) -> Result<Self, FieldError> {
        Self::parse(Some(&raw.into()))
    }

    /// Validate an optional raw value, trimming surrounding whitespace.
    pub fn parse(raw: Option<&str>) -> Result<Self, FieldError> {
        let value = at_most(required_text(raw)?, USERNAME_MAX)?;
        if !username_regex().is_match(&value) {
            return Err(FieldError::InvalidUsername);
        }
        Ok(Self(value))
    }

    /// Borrow the username text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Syntactically valid email address of at most 254 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(raw: impl Into<String>) -> Result<Self, FieldError> {
        Self::parse(Some(&raw.into()))
    }

    /// Validate an optional raw value, trimming surrounding whitespace.
    pub fn parse(raw: Option<&str>) -> Result<Self, FieldError> {
        let value = at_most(required_text(raw)?, EMAIL_MAX)?;
        if !email_regex().is_match(&value) {
            return Err(FieldError::InvalidEmail);
        }
        Ok(Self(value))
    }

    /// Borrow the address text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Clear-text password accepted at registration.
///
/// The value is wiped from memory on drop and is never serialised.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate the length of a raw password. Whitespace is preserved.
    pub fn parse(raw: Option<&str>) -> Result<Self, FieldError> {
        let value = raw.ok_or(FieldError::Required)?;
        if value.is_empty() {
            return Err(FieldError::Blank);
        }
        let length = value.chars().count();
        if length < PASSWORD_MIN {
            return Err(FieldError::TooShort { min: PASSWORD_MIN });
        }
        if length > PASSWORD_MAX {
            return Err(FieldError::TooLong { max: PASSWORD_MAX });
        }
        Ok(Self(Zeroizing::new(value.to_owned())))
    }

    /// Expose the clear text for hashing.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Optional first or last name; empty when not supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonName(String);

impl PersonName {
    /// Validate an optional raw value. Missing input yields an empty name.
    pub fn parse(raw: Option<&str>) -> Result<Self, FieldError> {
        let value = raw.map(str::trim).unwrap_or_default().to_owned();
        Ok(Self(at_most(value, PERSON_NAME_MAX)?))
    }

    /// Borrow the name text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

impl TryFrom<String> for PersonName {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(Some(&value))
    }
}

/// Registered user as exposed by the domain. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    first_name: PersonName,
    last_name: PersonName,
}

impl User {
    /// Build a [`User`] from validated components.
    pub fn new(
        id: UserId,
        username: Username,
        email: EmailAddress,
        first_name: PersonName,
        last_name: PersonName,
    ) -> Self {
        Self {
            id,
            username,
            email,
            first_name,
            last_name,
        }
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }
}

/// Raw registration payload as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Validated registration request.
///
/// # Examples
/// ```
/// use recipe_backend::domain::{NewUser, RegistrationInput};
///
/// let input = RegistrationInput {
///     username: Some("newuser".into()),
///     email: Some("newuser@example.com".into()),
///     password: Some("newpassword".into()),
///     ..RegistrationInput::default()
/// };
/// let user = NewUser::validate(&input).expect("valid registration");
/// assert_eq!(user.username.as_str(), "newuser");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: Username,
    pub email: EmailAddress,
    pub password: Password,
    pub first_name: PersonName,
    pub last_name: PersonName,
}

impl NewUser {
    /// Validate every field, collecting all failures rather than stopping
    /// at the first one.
    pub fn validate(input: &RegistrationInput) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let username = record(&mut errors, "username", Username::parse(input.username.as_deref()));
        let email = record(&mut errors, "email", EmailAddress::parse(input.email.as_deref()));
        let password = record(&mut errors, "password", Password::parse(input.password.as_deref()));
        let first_name = record(
            &mut errors,
            "first_name",
            PersonName::parse(input.first_name.as_deref()),
        );
        let last_name = record(
            &mut errors,
            "last_name",
            PersonName::parse(input.last_name.as_deref()),
        );

        match (username, email, password, first_name, last_name) {
            (Some(username), Some(email), Some(password), Some(first_name), Some(last_name)) => {
                Ok(Self {
                    username,
                    email,
                    password,
                    first_name,
                    last_name,
                })
            }
            _ => Err(errors),
        }
    }
}

fn record<T>(errors: &mut FieldErrors, field: &str, result: Result<T, FieldError>) -> Option<T> {
    result.map_err(|err| errors.add(field, err.to_string())).ok()
}

#[cfg(test)]
mod tests;
