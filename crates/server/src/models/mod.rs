//! Domain models for the blog
//!
//! Documents are stored in MongoDB with string UUIDs as `_id` and
//! RFC 3339 timestamps, so the structs here serialize directly into
//! their stored form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User record as stored in the `users` collection.
///
/// Never serialize this directly into a response; it carries the
/// password hash. Convert to [`UserInfo`] first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Public user info (no sensitive data)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// A blog post, authored by a registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub body: String,
    /// Image filename under the images directory, uploaded separately.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(
        author_id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        photo: Option<String>,
        categories: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            author_id: author_id.into(),
            title: title.into(),
            body: body.into(),
            photo,
            categories,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A comment on a post. Only the body is editable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(
        post_id: impl Into<String>,
        author_id: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            post_id: post_id.into(),
            author_id: author_id.into(),
            body: body.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Session token for authenticated requests, persisted in the
/// `sessions` collection and cached in memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_info_omits_password_hash() {
        let user = User::new("alice", "alice@example.com", "$2b$12$hash");
        let info = UserInfo::from(user);
        let json = serde_json::to_value(&info).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn post_serializes_id_as_mongo_key() {
        let post = Post::new("user-1", "Title", "Body", None, vec!["rust".into()]);
        let json = serde_json::to_value(&post).unwrap();
        assert!(json.get("_id").is_some());
        assert!(json.get("photo").is_none());
        assert_eq!(json["categories"][0], "rust");
    }

    #[test]
    fn session_expiry() {
        let session = Session {
            token: "t".into(),
            user_id: "u".into(),
            created_at: Utc::now(),
            expires_at: Utc::now() - chrono::Duration::minutes(1),
        };
        assert!(session.is_expired());
    }
}
