//! Request context for authenticated handlers
//!
//! Extracting a [`Ctx`] validates the session cookie against the auth
//! manager. Handlers that take a `Ctx` parameter are the protected
//! surface; the router itself enforces nothing.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::auth::SESSION_COOKIE;
use crate::config::AppState;
use crate::error::{Error, Result};

#[derive(Clone, Debug)]
pub struct Ctx {
    user_id: String,
}

impl Ctx {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl FromRequestParts<AppState> for Ctx {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or(Error::AuthMissingToken)?;

        let user = state
            .auth
            .validate_session(&token)
            .await
            .map_err(|_| Error::AuthInvalidSession)?;

        Ok(Ctx::new(user.id))
    }
}
