//! Authentication
//!
//! Handles registration, login, and session management. Credentials
//! are bcrypt-hashed; sessions are server-side uuid tokens with a
//! fixed validity window, persisted through the store and cached in
//! memory. The token travels in an HTTP-only cookie.

use std::collections::HashMap;
use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Session, User};
use crate::store::MongoStore;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "token";

/// Session validity window in days.
const SESSION_TTL_DAYS: i64 = 7;

/// Auth manager handles all authentication
pub struct AuthManager {
    store: Arc<MongoStore>,
    /// In-memory session cache
    sessions: RwLock<HashMap<String, Session>>,
}

impl AuthManager {
    pub fn new(store: Arc<MongoStore>) -> Self {
        Self {
            store,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new user
    pub async fn register(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> Result<User> {
        let password_hash = hash(&password, DEFAULT_COST)?;
        let user = User::new(username, email, password_hash);
        self.store.create_user(&user).await?;

        info!("[Auth] User registered: {} ({})", user.username, user.email);
        Ok(user)
    }

    /// Verify credentials and create a session
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, Session)> {
        let user = self
            .store
            .user_by_email(email)
            .await?
            .ok_or(Error::LoginFail)?;

        if !verify(password, &user.password_hash)? {
            warn!("[Auth] Failed login attempt for {}", email);
            return Err(Error::LoginFail);
        }

        let session = Session {
            token: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            created_at: Utc::now(),
            expires_at: Utc::now() + chrono::Duration::days(SESSION_TTL_DAYS),
        };
        self.store.insert_session(&session).await?;
        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session.clone());

        info!("[Auth] User logged in: {}", user.username);
        Ok((user, session))
    }

    /// Resolve a session token to its user
    pub async fn validate_session(&self, token: &str) -> Result<User> {
        // Cache first
        let cached = self.sessions.read().await.get(token).cloned();
        let session = match cached {
            Some(session) if !session.is_expired() => session,
            Some(_) => {
                self.sessions.write().await.remove(token);
                return Err(Error::AuthInvalidSession);
            }
            None => {
                let session = self
                    .store
                    .session_by_token(token)
                    .await?
                    .ok_or(Error::AuthInvalidSession)?;
                if session.is_expired() {
                    return Err(Error::AuthInvalidSession);
                }
                self.sessions
                    .write()
                    .await
                    .insert(token.to_string(), session.clone());
                session
            }
        };

        self.store
            .user_by_id(&session.user_id)
            .await?
            .ok_or(Error::AuthInvalidSession)
    }

    /// Invalidate a session
    pub async fn logout(&self, token: &str) -> Result<()> {
        self.sessions.write().await.remove(token);
        self.store.delete_session(token).await?;

        info!("[Auth] Session invalidated");
        Ok(())
    }

    /// Update profile fields; a new password is re-hashed.
    pub async fn update_user(
        &self,
        user_id: &str,
        username: Option<String>,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<User> {
        let mut user = self
            .store
            .user_by_id(user_id)
            .await?
            .ok_or(Error::NotFound("user"))?;

        if let Some(username) = username {
            user.username = username;
        }
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(password) = password {
            user.password_hash = hash(&password, DEFAULT_COST)?;
        }
        user.updated_at = Utc::now();

        self.store.replace_user(&user).await?;
        Ok(user)
    }

    /// Remove an account, its owned records, and any cached sessions.
    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.store.delete_user(user_id).await?;
        self.sessions
            .write()
            .await
            .retain(|_, session| session.user_id != user_id);

        info!("[Auth] User deleted: {}", user_id);
        Ok(())
    }
}
