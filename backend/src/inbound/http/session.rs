//! Request authentication.
//!
//! A request is attributed to a user either by an `Authorization: Token
//! <key>` header (`Bearer` is accepted as well) or, when no token header is
//! present, by the user id stored in the cookie session. Presenting a bad
//! token is rejected outright instead of falling back to the session.

use actix_session::Session;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{AuthToken, Caller, Error, UserId};

use super::state::HttpState;

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Authorization schemes that carry an API token.
const TOKEN_SCHEMES: [&str; 2] = ["Token", "Bearer"];

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap an actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id, rotating the session key.
    pub fn persist_user(&self, user_id: UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.value())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current user id from the session, if present.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        match self.0.get::<i64>(USER_ID_KEY) {
            Ok(id) => Ok(id.map(UserId::new)),
            Err(error) => {
                warn!("unreadable user id in session cookie: {error}");
                Ok(None)
            }
        }
    }

    /// Forget the session entirely.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

/// Token presented in the `Authorization` header, if the header uses a
/// token scheme.
fn presented_token(req: &HttpRequest) -> Result<Option<AuthToken>, Error> {
    let Some(value) = req.headers().get(AUTHORIZATION) else {
        return Ok(None);
    };
    let raw = value.to_str().map_err(|_| {
        Error::unauthorized(
            "Invalid token header. Token string should not contain invalid characters.",
        )
    })?;

    let mut parts = raw.split_whitespace();
    let Some(scheme) = parts.next() else {
        return Ok(None);
    };
    if !TOKEN_SCHEMES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(scheme))
    {
        return Ok(None);
    }

    let Some(key) = parts.next() else {
        return Err(Error::unauthorized(
            "Invalid token header. No credentials provided.",
        ));
    };
    if parts.next().is_some() {
        return Err(Error::unauthorized(
            "Invalid token header. Token string should not contain spaces.",
        ));
    }
    AuthToken::parse(key)
        .map(Some)
        .ok_or_else(|| Error::unauthorized("Invalid token."))
}

impl FromRequest for Caller {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let token = presented_token(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let session = SessionContext::from_request(req, payload);

        Box::pin(async move {
            if let Some(token) = token? {
                let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
                let user_id = state.login.resolve_token(&token).await?;
                return Ok(Caller::User(user_id));
            }

            let session = session.await?;
            Ok(session
                .user_id()?
                .map_or(Caller::Anonymous, Caller::User))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test};
    use mockall::predicate::eq;
    use rstest::rstest;

    use crate::domain::ports::{
        MockLoginService, MockRecipesCommand, MockRecipesQuery, MockUserAccounts,
    };
    use crate::inbound::http::state::HttpStatePorts;
    use crate::inbound::http::test_utils::test_session_middleware;

    const KEY: &str = "0123456789abcdef0123456789abcdef01234567";

    fn state_with_login(login: MockLoginService) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(HttpStatePorts {
            login: Arc::new(login),
            accounts: Arc::new(MockUserAccounts::new()),
            recipes: Arc::new(MockRecipesQuery::new()),
            recipe_commands: Arc::new(MockRecipesCommand::new()),
        }))
    }

    async fn whoami(caller: Caller) -> HttpResponse {
        match caller {
            Caller::Anonymous => HttpResponse::Ok().body("anonymous"),
            Caller::User(id) => HttpResponse::Ok().body(id.to_string()),
        }
    }

    async fn login(session: SessionContext) -> Result<HttpResponse, Error> {
        session.persist_user(UserId::new(7))?;
        Ok(HttpResponse::Ok().finish())
    }

    #[rstest]
    #[case("Token")]
    #[case("Bearer")]
    #[case("token")]
    #[actix_web::test]
    async fn token_header_resolves_caller(#[case] scheme: &str) {
        let mut login = MockLoginService::new();
        login
            .expect_resolve_token()
            .with(eq(AuthToken::from_stored(KEY)))
            .times(1)
            .returning(|_| Ok(UserId::new(42)));
        let app = test::init_service(
            App::new()
                .app_data(state_with_login(login))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((AUTHORIZATION, format!("{scheme} {KEY}")))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "42");
    }

    #[rstest]
    #[case("Token")]
    #[case("Token abc")]
    #[case("Token a b")]
    #[actix_web::test]
    async fn malformed_token_header_is_unauthorised(#[case] header: &str) {
        let app = test::init_service(
            App::new()
                .app_data(state_with_login(MockLoginService::new()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((AUTHORIZATION, header))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_token_is_unauthorised() {
        let mut login = MockLoginService::new();
        login
            .expect_resolve_token()
            .returning(|_| Err(Error::unauthorized("Invalid token.")));
        let app = test::init_service(
            App::new()
                .app_data(state_with_login(login))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((AUTHORIZATION, format!("Token {KEY}")))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn other_schemes_fall_back_to_anonymous() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data(state_with_login(MockLoginService::new()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((AUTHORIZATION, "Basic Zm9vOmJhcg=="))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "anonymous");
    }

    #[rstest]
    #[actix_web::test]
    async fn session_user_is_the_caller() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data(state_with_login(MockLoginService::new()))
                .route("/login", web::post().to(login))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let res =
            test::call_service(&app, test::TestRequest::post().uri("/login").to_request()).await;
        let cookie = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let req = test::TestRequest::get()
            .uri("/whoami")
            .cookie(cookie)
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "7");
    }
}
