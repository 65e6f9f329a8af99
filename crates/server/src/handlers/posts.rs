//! Post handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::config::AppState;
use crate::ctx::Ctx;
use crate::error::{Error, Result};
use crate::models::Post;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
    pub photo: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// POST /api/posts
pub async fn create_post(
    State(state): State<AppState>,
    ctx: Ctx,
    Json(req): Json<CreatePostRequest>,
) -> Result<Json<Post>> {
    info!("POST /api/posts - {}", req.title);

    let post = Post::new(ctx.user_id(), req.title, req.body, req.photo, req.categories);
    state.store.create_post(&post).await?;
    Ok(Json(post))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListPostsQuery {
    /// Case-insensitive title search
    pub search: Option<String>,
    /// Filter by author id
    pub author: Option<String>,
}

/// GET /api/posts
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> Result<Json<Vec<Post>>> {
    let posts = state
        .store
        .list_posts(query.search.as_deref(), query.author.as_deref())
        .await?;
    Ok(Json(posts))
}

/// GET /api/posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>> {
    let post = state
        .store
        .post_by_id(&id)
        .await?
        .ok_or(Error::NotFound("post"))?;
    Ok(Json(post))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub photo: Option<String>,
    pub categories: Option<Vec<String>>,
}

/// PUT /api/posts/{id}
pub async fn update_post(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Json<Post>> {
    info!("PUT /api/posts/{}", id);

    let mut post = state
        .store
        .post_by_id(&id)
        .await?
        .ok_or(Error::NotFound("post"))?;
    if post.author_id != ctx.user_id() {
        return Err(Error::Forbidden);
    }

    if let Some(title) = req.title {
        post.title = title;
    }
    if let Some(body) = req.body {
        post.body = body;
    }
    if let Some(photo) = req.photo {
        post.photo = Some(photo);
    }
    if let Some(categories) = req.categories {
        post.categories = categories;
    }
    post.updated_at = Utc::now();

    state.store.replace_post(&post).await?;
    Ok(Json(post))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
) -> Result<Json<&'static str>> {
    info!("DELETE /api/posts/{}", id);

    let post = state
        .store
        .post_by_id(&id)
        .await?
        .ok_or(Error::NotFound("post"))?;
    if post.author_id != ctx.user_id() {
        return Err(Error::Forbidden);
    }

    state.store.delete_post(&id).await?;
    Ok(Json("post deleted"))
}
