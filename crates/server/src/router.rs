//! Router assembly
//!
//! Explicit, ordered route registration: the four `/api` groups, the
//! upload route, image serving, and the frontend catch-all last. Each
//! group is a small router of its own, nested under its path prefix.

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::{AppState, ServerConfig};
use crate::handlers;

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/me", get(handlers::me))
}

fn user_routes() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(handlers::get_user)
            .put(handlers::update_user)
            .delete(handlers::delete_user),
    )
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_posts).post(handlers::create_post))
        .route(
            "/{id}",
            get(handlers::get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
}

fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_comment))
        .route("/post/{post_id}", get(handlers::list_post_comments))
        .route(
            "/{id}",
            put(handlers::update_comment).delete(handlers::delete_comment),
        )
}

/// Build the full application router.
///
/// The frontend bundle is registered as the fallback service, so every
/// API and image route wins first and any unmatched path serves the
/// frontend entry file.
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let frontend = ServeDir::new(&state.config.static_dir)
        .not_found_service(ServeFile::new(state.config.static_dir.join("index.html")));

    let router = Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/users", user_routes())
        .nest("/api/posts", post_routes())
        .nest("/api/comments", comment_routes())
        .route(
            "/api/upload",
            post(handlers::upload_image)
                .layer(DefaultBodyLimit::max(state.config.max_upload_bytes())),
        )
        .nest_service("/images", ServeDir::new(&state.config.images_dir))
        .fallback_service(frontend)
        .layer(cors_layer(&state.config)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(router)
}

/// Single-origin CORS with credentials, for the frontend dev server.
fn cors_layer(config: &ServerConfig) -> anyhow::Result<CorsLayer> {
    let origin: HeaderValue = config
        .cors_origin
        .parse()
        .context("invalid CORS origin")?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]))
}
