//! Blog server configuration

use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::AuthManager;
use crate::store::MongoStore;

/// Configuration for the blog server, read from the environment.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// MongoDB connection string (`MONGO_URL`)
    pub mongo_url: String,
    /// HTTP listen port (`PORT`)
    pub port: u16,
    /// Directory for uploaded images (`IMAGES_DIR`)
    pub images_dir: PathBuf,
    /// Pre-built frontend bundle served for unmatched routes (`STATIC_DIR`)
    pub static_dir: PathBuf,
    /// Single origin allowed by CORS, with credentials (`CORS_ORIGIN`)
    pub cors_origin: String,
    /// Max upload size in MB
    pub max_upload_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            mongo_url: "mongodb://localhost:27017/blog".to_string(),
            port: 5000,
            images_dir: PathBuf::from("images"),
            static_dir: PathBuf::from("frontend/dist"),
            cors_origin: "http://localhost:5173".to_string(),
            max_upload_mb: 10,
        }
    }
}

impl ServerConfig {
    /// Build configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            mongo_url: std::env::var("MONGO_URL").unwrap_or(defaults.mongo_url),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            images_dir: std::env::var("IMAGES_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.images_dir),
            static_dir: std::env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            cors_origin: std::env::var("CORS_ORIGIN").unwrap_or(defaults.cors_origin),
            max_upload_mb: defaults.max_upload_mb,
        }
    }

    /// Ensure the upload directory exists
    pub async fn ensure_dirs(&self) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.images_dir).await?;
        Ok(())
    }

    /// Max upload size in bytes
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}

/// App state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub store: Arc<MongoStore>,
    pub auth: Arc<AuthManager>,
}
