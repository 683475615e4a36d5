//! Authentication primitives: login credentials, stored password hashes and
//! API tokens.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use argon2::Argon2;
use argon2::password_hash::{
    self, PasswordHash as PhcString, PasswordHasher, PasswordVerifier, SaltString,
};
use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use super::Password;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

impl LoginValidationError {
    /// Payload field the failure belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyUsername => "username",
            Self::EmptyPassword => "password",
        }
    }
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` must be non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use recipe_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("foo", "foopassword").unwrap();
/// assert_eq!(creds.username(), "foo");
/// assert_eq!(creds.password(), "foopassword");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Argon2 PHC string stored in place of a clear-text password.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a validated password with a fresh random salt.
    pub fn hash(password: &Password) -> Result<Self, password_hash::Error> {
        let mut salt_bytes = [0_u8; 16];
        OsRng.fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes)?;
        let phc = Argon2::default().hash_password(password.expose().as_bytes(), &salt)?;
        Ok(Self(phc.to_string()))
    }

    /// Wrap a PHC string loaded from storage.
    pub fn from_stored(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// Check a clear-text candidate. Malformed stored hashes never verify.
    pub fn verify(&self, candidate: &str) -> bool {
        match PhcString::new(&self.0) {
            Ok(parsed) => Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok(),
            Err(error) => {
                tracing::warn!(%error, "stored password hash is not a valid PHC string");
                false
            }
        }
    }

    /// PHC string for persistence.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(***)")
    }
}

/// Length of a token key in hex characters.
pub const TOKEN_KEY_LEN: usize = 40;

/// API token key: 40 lowercase hexadecimal characters.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AuthToken(String);

impl AuthToken {
    /// Generate a new random key.
    pub fn generate() -> Self {
        let mut bytes = [0_u8; TOKEN_KEY_LEN / 2];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Parse a key presented by a client. Returns `None` when malformed.
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = raw.len() == TOKEN_KEY_LEN
            && raw.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        valid.then(|| Self(raw.to_owned()))
    }

    /// Wrap a key loaded from storage.
    pub fn from_stored(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthToken({}...)", &self.0[..6.min(self.0.len())])
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn credentials_trim_username_only() {
        let creds = LoginCredentials::try_from_parts("  foo  ", " pw ").expect("valid inputs");
        assert_eq!(creds.username(), "foo");
        assert_eq!(creds.password(), " pw ");
    }

    #[rstest]
    fn password_hash_verifies_only_the_original() {
        let password = Password::parse(Some("foopassword")).expect("valid password");
        let hash = PasswordHash::hash(&password).expect("hashing succeeds");

        assert!(hash.as_str().starts_with("$argon2"));
        assert!(hash.verify("foopassword"));
        assert!(!hash.verify("wrongpassword"));
    }

    #[rstest]
    fn malformed_stored_hash_never_verifies() {
        assert!(!PasswordHash::from_stored("plain-text").verify("plain-text"));
    }

    #[rstest]
    fn generated_tokens_are_parseable_and_distinct() {
        let first = AuthToken::generate();
        let second = AuthToken::generate();

        assert_eq!(first.as_str().len(), TOKEN_KEY_LEN);
        assert_eq!(AuthToken::parse(first.as_str()), Some(first.clone()));
        assert_ne!(first, second);
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("ZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZ")]
    #[case("0123456789ABCDEF0123456789abcdef01234567")]
    fn malformed_token_keys_are_rejected(#[case] raw: &str) {
        assert!(AuthToken::parse(raw).is_none());
    }
}
