//! Comment handlers

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::config::AppState;
use crate::ctx::Ctx;
use crate::error::{Error, Result};
use crate::models::Comment;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub post_id: String,
    pub body: String,
}

/// POST /api/comments
pub async fn create_comment(
    State(state): State<AppState>,
    ctx: Ctx,
    Json(req): Json<CreateCommentRequest>,
) -> Result<Json<Comment>> {
    info!("POST /api/comments - post {}", req.post_id);

    let comment = Comment::new(req.post_id, ctx.user_id(), req.body);
    state.store.create_comment(&comment).await?;
    Ok(Json(comment))
}

/// GET /api/comments/post/{post_id}
pub async fn list_post_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<Vec<Comment>>> {
    let comments = state.store.comments_for_post(&post_id).await?;
    Ok(Json(comments))
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub body: String,
}

/// PUT /api/comments/{id}
pub async fn update_comment(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
    Json(req): Json<UpdateCommentRequest>,
) -> Result<Json<Comment>> {
    info!("PUT /api/comments/{}", id);

    let mut comment = state
        .store
        .comment_by_id(&id)
        .await?
        .ok_or(Error::NotFound("comment"))?;
    if comment.author_id != ctx.user_id() {
        return Err(Error::Forbidden);
    }

    comment.body = req.body;
    comment.updated_at = Utc::now();

    state.store.replace_comment(&comment).await?;
    Ok(Json(comment))
}

/// DELETE /api/comments/{id}
pub async fn delete_comment(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
) -> Result<Json<&'static str>> {
    info!("DELETE /api/comments/{}", id);

    let comment = state
        .store
        .comment_by_id(&id)
        .await?
        .ok_or(Error::NotFound("comment"))?;
    if comment.author_id != ctx.user_id() {
        return Err(Error::Forbidden);
    }

    state.store.delete_comment(&id).await?;
    Ok(Json("comment deleted"))
}
