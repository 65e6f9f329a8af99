//! User profile handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::config::AppState;
use crate::ctx::Ctx;
use crate::error::{Error, Result};
use crate::models::UserInfo;

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserInfo>> {
    let user = state
        .store
        .user_by_id(&id)
        .await?
        .ok_or(Error::NotFound("user"))?;
    Ok(Json(user.into()))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserInfo>> {
    info!("PUT /api/users/{}", id);

    if ctx.user_id() != id {
        return Err(Error::Forbidden);
    }

    let user = state
        .auth
        .update_user(&id, req.username, req.email, req.password)
        .await?;
    Ok(Json(user.into()))
}

/// DELETE /api/users/{id}
///
/// Removes the account along with its posts, the comments on those
/// posts, and the account's comments on other posts.
pub async fn delete_user(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
) -> Result<Json<&'static str>> {
    info!("DELETE /api/users/{}", id);

    if ctx.user_id() != id {
        return Err(Error::Forbidden);
    }

    state.auth.delete_user(&id).await?;
    Ok(Json("user deleted"))
}
