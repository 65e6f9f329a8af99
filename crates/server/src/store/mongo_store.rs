//! MongoDB resource store
//!
//! Owns the database client and the typed collections for users,
//! posts, comments, and sessions. Opening the store builds the client
//! without touching the network; [`MongoStore::ping`] performs the
//! actual connection check so startup can gate on it.

use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::FindOptions;
use mongodb::{Client, Collection, Database};
use tracing::info;

use crate::error::{Error, Result};
use crate::models::{Comment, Post, Session, User};

/// Database name used when the connection string does not carry one.
const DEFAULT_DB: &str = "blog";

pub struct MongoStore {
    client: Client,
    db: Database,
    users: Collection<User>,
    posts: Collection<Post>,
    comments: Collection<Comment>,
    sessions: Collection<Session>,
}

impl MongoStore {
    /// Build a store handle from a connection string.
    ///
    /// The driver connects lazily, so this only fails on a malformed
    /// connection string.
    pub async fn open(mongo_url: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongo_url).await?;
        let db = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DB));

        let users = db.collection::<User>("users");
        let posts = db.collection::<Post>("posts");
        let comments = db.collection::<Comment>("comments");
        let sessions = db.collection::<Session>("sessions");

        Ok(Self {
            client,
            db,
            users,
            posts,
            comments,
            sessions,
        })
    }

    /// Round-trip to the server. Startup treats a failure here as
    /// terminal and never binds the listener.
    pub async fn ping(&self) -> Result<()> {
        self.db.run_command(doc! { "ping": 1 }, None).await?;
        info!("[Store] Connected to database {:?}", self.db.name());
        Ok(())
    }

    /// Close the underlying client, terminating pooled connections.
    pub async fn close(&self) {
        self.client.clone().shutdown().await;
        info!("[Store] Database connection closed");
    }

    // ---- Users ----

    pub async fn create_user(&self, user: &User) -> Result<()> {
        let existing = self
            .users
            .find_one(
                doc! { "$or": [
                    { "email": user.email.as_str() },
                    { "username": user.username.as_str() },
                ]},
                None,
            )
            .await?;
        if existing.is_some() {
            return Err(Error::Duplicate("email or username"));
        }

        self.users.insert_one(user, None).await?;
        Ok(())
    }

    pub async fn user_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.find_one(doc! { "_id": id }, None).await?)
    }

    pub async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.find_one(doc! { "email": email }, None).await?)
    }

    pub async fn replace_user(&self, user: &User) -> Result<()> {
        let result = self
            .users
            .replace_one(doc! { "_id": user.id.as_str() }, user, None)
            .await?;
        if result.matched_count == 0 {
            return Err(Error::NotFound("user"));
        }
        Ok(())
    }

    /// Remove a user and everything hanging off them: their posts, the
    /// comments on those posts, their comments elsewhere, and their
    /// sessions.
    pub async fn delete_user(&self, id: &str) -> Result<()> {
        let cursor = self.posts.find(doc! { "author_id": id }, None).await?;
        let posts: Vec<Post> = cursor.try_collect().await?;
        let post_ids: Vec<String> = posts.into_iter().map(|p| p.id).collect();

        if !post_ids.is_empty() {
            self.comments
                .delete_many(doc! { "post_id": { "$in": post_ids } }, None)
                .await?;
        }
        self.posts.delete_many(doc! { "author_id": id }, None).await?;
        self.comments
            .delete_many(doc! { "author_id": id }, None)
            .await?;
        self.sessions
            .delete_many(doc! { "user_id": id }, None)
            .await?;

        let result = self.users.delete_one(doc! { "_id": id }, None).await?;
        if result.deleted_count == 0 {
            return Err(Error::NotFound("user"));
        }
        Ok(())
    }

    // ---- Posts ----

    pub async fn create_post(&self, post: &Post) -> Result<()> {
        if self.user_by_id(&post.author_id).await?.is_none() {
            return Err(Error::NotFound("author"));
        }
        self.posts.insert_one(post, None).await?;
        Ok(())
    }

    pub async fn post_by_id(&self, id: &str) -> Result<Option<Post>> {
        Ok(self.posts.find_one(doc! { "_id": id }, None).await?)
    }

    /// List posts, newest first. `search` is a case-insensitive title
    /// match; `author` narrows to one author's posts.
    pub async fn list_posts(
        &self,
        search: Option<&str>,
        author: Option<&str>,
    ) -> Result<Vec<Post>> {
        let mut filter = Document::new();
        if let Some(search) = search {
            filter.insert("title", doc! { "$regex": search, "$options": "i" });
        }
        if let Some(author) = author {
            filter.insert("author_id", author);
        }

        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let cursor = self.posts.find(filter, options).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn replace_post(&self, post: &Post) -> Result<()> {
        let result = self
            .posts
            .replace_one(doc! { "_id": post.id.as_str() }, post, None)
            .await?;
        if result.matched_count == 0 {
            return Err(Error::NotFound("post"));
        }
        Ok(())
    }

    /// Remove a post together with its comments.
    pub async fn delete_post(&self, id: &str) -> Result<()> {
        self.comments
            .delete_many(doc! { "post_id": id }, None)
            .await?;
        let result = self.posts.delete_one(doc! { "_id": id }, None).await?;
        if result.deleted_count == 0 {
            return Err(Error::NotFound("post"));
        }
        Ok(())
    }

    // ---- Comments ----

    pub async fn create_comment(&self, comment: &Comment) -> Result<()> {
        if self.post_by_id(&comment.post_id).await?.is_none() {
            return Err(Error::NotFound("post"));
        }
        if self.user_by_id(&comment.author_id).await?.is_none() {
            return Err(Error::NotFound("author"));
        }
        self.comments.insert_one(comment, None).await?;
        Ok(())
    }

    pub async fn comment_by_id(&self, id: &str) -> Result<Option<Comment>> {
        Ok(self.comments.find_one(doc! { "_id": id }, None).await?)
    }

    /// Comments for a post, oldest first.
    pub async fn comments_for_post(&self, post_id: &str) -> Result<Vec<Comment>> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": 1 })
            .build();
        let cursor = self
            .comments
            .find(doc! { "post_id": post_id }, options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn replace_comment(&self, comment: &Comment) -> Result<()> {
        let result = self
            .comments
            .replace_one(doc! { "_id": comment.id.as_str() }, comment, None)
            .await?;
        if result.matched_count == 0 {
            return Err(Error::NotFound("comment"));
        }
        Ok(())
    }

    pub async fn delete_comment(&self, id: &str) -> Result<()> {
        let result = self.comments.delete_one(doc! { "_id": id }, None).await?;
        if result.deleted_count == 0 {
            return Err(Error::NotFound("comment"));
        }
        Ok(())
    }

    // ---- Sessions ----

    pub async fn insert_session(&self, session: &Session) -> Result<()> {
        self.sessions.insert_one(session, None).await?;
        Ok(())
    }

    pub async fn session_by_token(&self, token: &str) -> Result<Option<Session>> {
        Ok(self.sessions.find_one(doc! { "token": token }, None).await?)
    }

    pub async fn delete_session(&self, token: &str) -> Result<()> {
        self.sessions
            .delete_one(doc! { "token": token }, None)
            .await?;
        Ok(())
    }
}
