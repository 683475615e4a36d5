//! Credential exchange and browser session handlers.
//!
//! ```text
//! POST /api/v1/auth-token/   {"username": "...", "password": "..."} -> {"token": "..."}
//! POST /api/v1/auth/login/   same body; stores the user in the cookie session
//! POST /api/v1/auth/logout/  clears the session
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{FieldError, FieldErrors, LoginCredentials};
use crate::inbound::http::ApiResult;
use crate::inbound::http::collection::WriteFields;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Response body of `POST /api/v1/auth-token/`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Credentials request body, also accepted as a Collection+JSON template.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Extract credentials, reporting missing or blank fields together.
fn credentials(body: &[u8]) -> ApiResult<LoginCredentials> {
    let mut fields = WriteFields::parse(body)?;
    let username = fields.take("username");
    let password = fields.take("password");

    let mut errors = FieldErrors::default();
    match username.as_deref() {
        None => errors.add("username", FieldError::Required.to_string()),
        Some(value) if value.trim().is_empty() => {
            errors.add("username", FieldError::Blank.to_string())
        }
        Some(_) => {}
    }
    // Passwords keep surrounding whitespace, so only an empty one is blank.
    match password.as_deref() {
        None => errors.add("password", FieldError::Required.to_string()),
        Some("") => errors.add("password", FieldError::Blank.to_string()),
        Some(_) => {}
    }
    errors.into_result()?;

    LoginCredentials::try_from_parts(
        username.as_deref().unwrap_or_default(),
        password.as_deref().unwrap_or_default(),
    )
    .map_err(|err| FieldErrors::single(err.field(), FieldError::Blank.to_string()))
}

/// Exchange credentials for the caller's API token.
#[utoipa::path(
    post,
    path = "/api/v1/auth-token/",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Token for `Authorization: Token <key>`", body = TokenResponse),
        (status = 400, description = "Missing fields or bad credentials", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "obtainToken",
    security([])
)]
#[post("/auth-token/")]
pub async fn obtain_token(
    state: web::Data<HttpState>,
    body: web::Bytes,
) -> ApiResult<web::Json<TokenResponse>> {
    let credentials = credentials(&body)?;
    let token = state.login.obtain_token(&credentials).await?;
    Ok(web::Json(TokenResponse {
        token: token.as_str().to_owned(),
    }))
}

/// Authenticate and establish a cookie session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login/",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Logged in", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Missing fields or bad credentials", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login/")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let credentials = credentials(&body)?;
    let user_id = state.login.authenticate(&credentials).await?;
    session.persist_user(user_id)?;
    Ok(HttpResponse::Ok().finish())
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout/",
    responses((status = 200, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout/")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::Ok().finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use mockall::predicate::always;
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::domain::ports::MockLoginService;
    use crate::domain::{AuthToken, Error, UserId};
    use crate::inbound::http::test_utils::{MockPorts, test_session_middleware};

    const KEY: &str = "0123456789abcdef0123456789abcdef01234567";

    fn state(login_service: MockLoginService) -> web::Data<HttpState> {
        MockPorts {
            login: login_service,
            ..MockPorts::default()
        }
        .into_state()
    }

    #[rstest]
    #[actix_web::test]
    async fn token_exchange_returns_key() {
        let mut login_service = MockLoginService::new();
        login_service
            .expect_obtain_token()
            .with(always())
            .times(1)
            .returning(|_| Ok(AuthToken::from_stored(KEY)));
        let app = test::init_service(
            App::new()
                .app_data(state(login_service))
                .service(obtain_token),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth-token/")
            .set_json(json!({"username": "foo", "password": "foopassword"}))
            .to_request();
        let body: TokenResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.token, KEY);
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_fields_are_reported_together() {
        let app = test::init_service(
            App::new()
                .app_data(state(MockLoginService::new()))
                .service(obtain_token),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth-token/")
            .set_json(json!({"username": "  "}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body["details"],
            json!({
                "username": ["This field may not be blank."],
                "password": ["This field is required."]
            })
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn bad_credentials_are_a_non_field_error() {
        let mut login_service = MockLoginService::new();
        login_service.expect_obtain_token().returning(|_| {
            Err(FieldErrors::non_field(
                "Unable to log in with provided credentials.",
            ))
        });
        let app = test::init_service(
            App::new()
                .app_data(state(login_service))
                .service(obtain_token),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth-token/")
            .set_json(json!({"username": "foo", "password": "wrong"}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body["details"]["non_field_errors"],
            json!(["Unable to log in with provided credentials."])
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn login_sets_session_cookie_and_logout_clears_it() {
        let mut login_service = MockLoginService::new();
        login_service
            .expect_authenticate()
            .times(1)
            .returning(|_| Ok(UserId::new(5)));
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data(state(login_service))
                .service(login)
                .service(logout),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth/login/")
            .set_json(json!({"username": "foo", "password": "foopassword"}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let cookie = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let req = test::TestRequest::post()
            .uri("/auth/logout/")
            .cookie(cookie)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let removed = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("removal cookie sent");
        assert_eq!(removed.value(), "");
    }

    #[rstest]
    #[actix_web::test]
    async fn failed_login_is_bad_request() {
        let mut login_service = MockLoginService::new();
        login_service
            .expect_authenticate()
            .returning(|_| Err(Error::invalid_request("validation failed")));
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data(state(login_service))
                .service(login),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth/login/")
            .set_json(json!({"username": "foo", "password": "nope"}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
