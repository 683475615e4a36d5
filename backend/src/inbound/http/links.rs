//! Absolute resource URLs.
//!
//! Hrefs are built from the request's scheme and host so clients can
//! follow them without knowing where the API is mounted.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload};

use crate::domain::{IngredientId, RecipeId, StepId, UserId};

/// Path prefix every resource lives under.
pub const API_PREFIX: &str = "/api/v1";

/// URL builder rooted at `<scheme>://<host>/api/v1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Links {
    base: String,
    request: String,
}

impl Links {
    pub fn for_request(req: &HttpRequest) -> Self {
        let info = req.connection_info();
        let origin = format!("{}://{}", info.scheme(), info.host());
        let request = format!("{origin}{}", req.uri());
        Self {
            base: format!("{origin}{API_PREFIX}"),
            request,
        }
    }

    /// Absolute URL of the current request, query string included.
    pub fn request(&self) -> &str {
        &self.request
    }

    /// Recipe collection.
    pub fn recipes(&self) -> String {
        format!("{}/", self.base)
    }

    /// Filtered recipe search.
    pub fn search(&self) -> String {
        format!("{}/search/", self.base)
    }

    pub fn recipe(&self, id: RecipeId) -> String {
        format!("{}/{id}/", self.base)
    }

    pub fn recipe_ingredients(&self, id: RecipeId) -> String {
        format!("{}/{id}/ingredients/", self.base)
    }

    pub fn recipe_steps(&self, id: RecipeId) -> String {
        format!("{}/{id}/steps/", self.base)
    }

    pub fn ingredient(&self, id: IngredientId) -> String {
        format!("{}/ingredients/{id}/", self.base)
    }

    pub fn step(&self, id: StepId) -> String {
        format!("{}/steps/{id}/", self.base)
    }

    pub fn users(&self) -> String {
        format!("{}/users/", self.base)
    }

    pub fn user(&self, id: UserId) -> String {
        format!("{}/users/{id}/", self.base)
    }
}

impl FromRequest for Links {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(Self::for_request(req)))
    }
}
