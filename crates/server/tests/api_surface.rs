//! Router-level tests for the HTTP surface that does not need a live
//! database: image upload and serving, the frontend catch-all, CORS,
//! and session gating of mutating routes. The MongoDB client connects
//! lazily, so building the app state never touches the network.

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::tempdir;
use tower::ServiceExt;

use server::auth::AuthManager;
use server::config::{AppState, ServerConfig};
use server::router::build_router;
use server::store::MongoStore;

const FRONTEND_ENTRY: &str = "<!doctype html><html><body>blog frontend</body></html>";
const BOUNDARY: &str = "X-BLOG-TEST-BOUNDARY";
const ORIGIN: &str = "http://localhost:5173";

async fn test_state(root: &Path) -> AppState {
    let config = ServerConfig {
        mongo_url: "mongodb://127.0.0.1:27017/blog-test".to_string(),
        port: 0,
        images_dir: root.join("images"),
        static_dir: root.join("dist"),
        cors_origin: ORIGIN.to_string(),
        max_upload_mb: 10,
    };
    config.ensure_dirs().await.unwrap();
    tokio::fs::create_dir_all(&config.static_dir).await.unwrap();
    tokio::fs::write(config.static_dir.join("index.html"), FRONTEND_ENTRY)
        .await
        .unwrap();

    let store = Arc::new(MongoStore::open(&config.mongo_url).await.unwrap());
    let auth = Arc::new(AuthManager::new(store.clone()));

    AppState {
        config,
        store,
        auth,
    }
}

fn app(state: &AppState) -> Router {
    build_router(state.clone()).unwrap()
}

fn multipart_body(img: Option<&str>, file: Option<&[u8]>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(img) = img {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"img\"\r\n\r\n{img}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
                 filename=\"upload.bin\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(file);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(img: Option<&str>, file: Option<&[u8]>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(img, file)))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

#[tokio::test]
async fn upload_then_fetch_roundtrip() {
    let dir = tempdir().unwrap();
    let state = test_state(dir.path()).await;

    let payload = b"\x89PNG fake image bytes";
    let response = app(&state)
        .oneshot(upload_request(Some("cover.png"), Some(payload)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let confirmation = body_bytes(response).await;
    assert_eq!(
        confirmation,
        b"\"Image has been uploaded successfully!\"".to_vec()
    );

    let response = app(&state)
        .oneshot(
            Request::builder()
                .uri("/images/cover.png")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, payload.to_vec());
}

#[tokio::test]
async fn reupload_overwrites_previous_file() {
    let dir = tempdir().unwrap();
    let state = test_state(dir.path()).await;

    for payload in [b"first version".as_slice(), b"second version".as_slice()] {
        let response = app(&state)
            .oneshot(upload_request(Some("photo.jpg"), Some(payload)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app(&state)
        .oneshot(
            Request::builder()
                .uri("/images/photo.jpg")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(body_bytes(response).await, b"second version".to_vec());
}

#[tokio::test]
async fn upload_rejects_traversal_names() {
    let dir = tempdir().unwrap();
    let state = test_state(dir.path()).await;

    let response = app(&state)
        .oneshot(upload_request(Some("../escape.png"), Some(b"data")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing may land outside the images directory.
    assert!(!dir.path().join("escape.png").exists());
}

#[tokio::test]
async fn upload_requires_both_fields() {
    let dir = tempdir().unwrap();
    let state = test_state(dir.path()).await;

    let response = app(&state)
        .oneshot(upload_request(None, Some(b"data")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(error["error"]["message"].is_string());

    let response = app(&state)
        .oneshot(upload_request(Some("a.png"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn catch_all_serves_frontend_entry() {
    let dir = tempdir().unwrap();
    let state = test_state(dir.path()).await;

    for path in ["/", "/posts/some-slug", "/settings"] {
        let response = app(&state)
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "path {path}");
        assert_eq!(body_bytes(response).await, FRONTEND_ENTRY.as_bytes());
    }
}

#[tokio::test]
async fn cors_preflight_allows_only_configured_origin() {
    let dir = tempdir().unwrap();
    let state = test_state(dir.path()).await;

    let preflight = |origin: &str| {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/posts")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    };

    let response = app(&state).oneshot(preflight(ORIGIN)).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_string()),
        Some(ORIGIN.to_string())
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .map(|v| v.to_str().unwrap().to_string()),
        Some("true".to_string())
    );

    let response = app(&state)
        .oneshot(preflight("http://evil.example"))
        .await
        .unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn mutating_routes_require_a_session() {
    let dir = tempdir().unwrap();
    let state = test_state(dir.path()).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/posts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"title":"t","body":"b"}"#))
        .unwrap();
    let response = app(&state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let error: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(error["error"]["message"], "authentication required");
}
