//! Auth handlers

use axum::{extract::State, Json};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use serde::Deserialize;
use tracing::info;

use crate::auth::SESSION_COOKIE;
use crate::config::AppState;
use crate::ctx::Ctx;
use crate::error::{Error, Result};
use crate::models::UserInfo;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<UserInfo>> {
    info!("POST /api/auth/register - {}", req.username);

    let user = state
        .auth
        .register(req.username, req.email, req.password)
        .await?;
    Ok(Json(user.into()))
}

/// POST /api/auth/login
///
/// On success the session token is set as an HTTP-only cookie; the
/// store-side expiry bounds its validity.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<UserInfo>)> {
    info!("POST /api/auth/login - {}", req.email);

    let (user, session) = state.auth.login(&req.email, &req.password).await?;

    let cookie = Cookie::build((SESSION_COOKIE, session.token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((jar.add(cookie), Json(user.into())))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<&'static str>)> {
    info!("POST /api/auth/logout");

    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.auth.logout(cookie.value()).await?;
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok((jar, Json("logged out")))
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, ctx: Ctx) -> Result<Json<UserInfo>> {
    let user = state
        .store
        .user_by_id(ctx.user_id())
        .await?
        .ok_or(Error::NotFound("user"))?;
    Ok(Json(user.into()))
}
