//! HTTP inbound adapter exposing the `/api/v1` REST resources.

pub mod auth;
pub mod collection;
pub mod error;
pub mod health;
pub mod ingredients;
pub mod links;
pub mod recipes;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
pub mod steps;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::http::header::LOCATION;
use actix_web::{HttpRequest, HttpResponse, Scope, web};

use crate::domain::Error;

pub use error::ApiResult;
pub use links::API_PREFIX;

/// Every resource endpoint, mounted under [`API_PREFIX`].
///
/// Numeric path patterns keep `search/`, `users/` and the child collections
/// from colliding with recipe ids.
pub fn api_scope() -> Scope {
    web::scope(API_PREFIX)
        .service(auth::obtain_token)
        .service(auth::login)
        .service(auth::logout)
        .service(users::list_users)
        .service(users::register_user)
        .service(users::get_user)
        .service(recipes::list_recipes)
        .service(recipes::create_recipe)
        .service(recipes::search_recipes)
        .service(recipes::get_recipe)
        .service(recipes::update_recipe)
        .service(recipes::delete_recipe)
        .service(ingredients::list_ingredients)
        .service(ingredients::create_ingredient)
        .service(ingredients::get_ingredient)
        .service(ingredients::update_ingredient)
        .service(ingredients::delete_ingredient)
        .service(steps::list_steps)
        .service(steps::create_step)
        .service(steps::get_step)
        .service(steps::update_step)
        .service(steps::delete_step)
}

/// Default service: redirects API paths missing their trailing slash,
/// otherwise answers with a JSON 404.
///
/// The redirect is a 308 so clients repeat the method and body.
pub async fn append_slash(req: HttpRequest) -> ApiResult<HttpResponse> {
    let path = req.path();
    let under_api = path == API_PREFIX || path.starts_with(&format!("{API_PREFIX}/"));
    if !under_api || path.ends_with('/') {
        return Err(Error::not_found("Not found."));
    }
    let location = match req.query_string() {
        "" => format!("{path}/"),
        query => format!("{path}/?{query}"),
    };
    Ok(HttpResponse::PermanentRedirect()
        .insert_header((LOCATION, location))
        .finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;

    use crate::inbound::http::test_utils::{memory_state, test_session_middleware};

    #[rstest]
    #[case("/api/v1/1", "/api/v1/1/")]
    #[case("/api/v1/search?name=soup", "/api/v1/search/?name=soup")]
    #[case("/api/v1", "/api/v1/")]
    #[actix_web::test]
    async fn missing_trailing_slash_redirects(#[case] uri: &str, #[case] location: &str) {
        let app = test::init_service(
            App::new()
                .app_data(memory_state())
                .wrap(test_session_middleware())
                .service(api_scope())
                .default_service(web::to(append_slash)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(
            res.headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some(location)
        );
    }

    #[rstest]
    #[case("/elsewhere")]
    #[case("/api/v1/recipes/")]
    #[actix_web::test]
    async fn unknown_paths_are_json_not_found(#[case] uri: &str) {
        let app = test::init_service(
            App::new()
                .app_data(memory_state())
                .wrap(test_session_middleware())
                .service(api_scope())
                .default_service(web::to(append_slash)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "not_found");
    }

    #[rstest]
    #[actix_web::test]
    async fn registered_user_can_fetch_own_profile_by_token() {
        let app = test::init_service(
            App::new()
                .app_data(memory_state())
                .wrap(test_session_middleware())
                .service(api_scope()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/users/")
            .set_json(serde_json::json!({
                "username": "newuser",
                "email": "newuser@example.com",
                "password": "password",
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let location = res
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .expect("location header")
            .to_owned();

        let req = test::TestRequest::post()
            .uri("/api/v1/auth-token/")
            .set_json(serde_json::json!({"username": "newuser", "password": "password"}))
            .to_request();
        let token: auth::TokenResponse = test::call_and_read_body_json(&app, req).await;

        let path = location
            .strip_prefix("http://localhost:8080")
            .expect("absolute href on the test host");
        let req = test::TestRequest::get()
            .uri(path)
            .insert_header(("Authorization", format!("Token {}", token.token)))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
