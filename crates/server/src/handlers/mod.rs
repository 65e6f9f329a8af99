//! HTTP handlers
//!
//! One module per route group. Handlers that require a valid session
//! take a [`crate::ctx::Ctx`] parameter; everything else is public.

pub mod auth;
pub mod comments;
pub mod posts;
pub mod upload;
pub mod users;

// Auth handlers
pub use auth::{login, logout, me, register};

// Resource handlers
pub use comments::{create_comment, delete_comment, list_post_comments, update_comment};
pub use posts::{create_post, delete_post, get_post, list_posts, update_post};
pub use users::{delete_user, get_user, update_user};

// Image upload
pub use upload::upload_image;
