//! Tests for the domain user model.

use super::*;
use rstest::{fixture, rstest};

#[fixture]
fn registration() -> RegistrationInput {
    RegistrationInput {
        username: Some("newuser".to_owned()),
        email: Some("newuser@example.com".to_owned()),
        password: Some("newpassword".to_owned()),
        first_name: None,
        last_name: Some("Smith".to_owned()),
    }
}

#[rstest]
#[case("foo")]
#[case("ada.lovelace@example")]
#[case("first+last-name_1")]
#[case("名前")]
fn usernames_accept_permitted_characters(#[case] raw: &str) {
    let username = Username::new(raw).expect("permitted username");
    assert_eq!(username.as_str(), raw);
}

#[rstest]
#[case("", FieldError::Blank)]
#[case("with space", FieldError::InvalidUsername)]
#[case("semi;colon", FieldError::InvalidUsername)]
fn usernames_reject_invalid_input(#[case] raw: &str, #[case] expected: FieldError) {
    assert_eq!(Username::new(raw), Err(expected));
}

#[rstest]
fn username_length_is_bounded() {
    assert!(Username::new("a".repeat(USERNAME_MAX)).is_ok());
    assert_eq!(
        Username::new("a".repeat(USERNAME_MAX + 1)),
        Err(FieldError::TooLong { max: USERNAME_MAX })
    );
}

#[rstest]
#[case("someone@example.com", true)]
#[case("first.last@sub.example.org", true)]
#[case("missing-at.example.com", false)]
#[case("no-tld@example", false)]
#[case("two@@example.com", false)]
#[case("spaced out@example.com", false)]
fn email_syntax(#[case] raw: &str, #[case] valid: bool) {
    assert_eq!(EmailAddress::new(raw).is_ok(), valid, "{raw}");
}

#[rstest]
#[case(None, Err(FieldError::Required))]
#[case(Some("short"), Err(FieldError::TooShort { min: PASSWORD_MIN }))]
#[case(Some("sixsix"), Ok(()))]
fn password_length(#[case] raw: Option<&str>, #[case] expected: Result<(), FieldError>) {
    assert_eq!(Password::parse(raw).map(|_| ()), expected);
}

#[rstest]
fn password_keeps_whitespace_and_hides_debug() {
    let password = Password::parse(Some(" secret ")).expect("valid password");
    assert_eq!(password.expose(), " secret ");
    assert_eq!(format!("{password:?}"), "Password(***)");
}

#[rstest]
fn validate_defaults_missing_names(registration: RegistrationInput) {
    let user = NewUser::validate(&registration).expect("valid registration");
    assert_eq!(user.first_name.as_str(), "");
    assert_eq!(user.last_name.as_str(), "Smith");
}

#[rstest]
fn validate_collects_every_field_failure() {
    let input = RegistrationInput {
        username: Some("bad name".to_owned()),
        email: Some("nope".to_owned()),
        password: Some("123".to_owned()),
        first_name: Some("x".repeat(PERSON_NAME_MAX + 1)),
        last_name: None,
    };

    let errors = NewUser::validate(&input).expect_err("every field is invalid");
    assert_eq!(errors.messages("username").len(), 1);
    assert_eq!(errors.messages("email"), ["Enter a valid email address."]);
    assert_eq!(
        errors.messages("password"),
        ["Ensure this field has at least 6 characters."]
    );
    assert_eq!(errors.messages("first_name").len(), 1);
    assert!(errors.messages("last_name").is_empty());
}

#[rstest]
fn validate_reports_missing_required_fields() {
    let errors = NewUser::validate(&RegistrationInput::default()).expect_err("empty payload");
    for field in ["username", "email", "password"] {
        assert_eq!(errors.messages(field), ["This field is required."], "{field}");
    }
}
