//! Storage layer
//!
//! Services talk to storage through [`UserStore`] and [`PostStore`] so the
//! SQLite [`Database`] can be swapped for the in-process [`MemoryStore`].
//! Every method is a single statement; nothing here spans a transaction.

pub mod db;
pub mod memory;

pub use db::Database;
pub use memory::MemoryStore;

use async_trait::async_trait;
use blog_types::{Post, User};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A UNIQUE constraint rejected the row
    #[error("Duplicate value: {0}")]
    Duplicate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Post fields as written to storage, after defaults are applied
#[derive(Debug, Clone)]
pub struct PostRecord {
    pub title: String,
    pub content: String,
    pub author: String,
    pub category: String,
    pub image: Option<String>,
    pub date: String,
}

impl PostRecord {
    pub fn into_post(self, id: i64) -> Post {
        Post {
            id,
            title: self.title,
            content: self.content,
            author: self.author,
            category: self.category,
            image: self.image,
            date: self.date,
        }
    }
}

/// User store
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    /// Returns the new user id; fails with [`StorageError::Duplicate`] if the email is taken
    async fn insert_user(&self, email: &str, password: &str) -> Result<i64>;
}

/// Post store
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Returns the assigned post id
    async fn insert_post(&self, post: &PostRecord) -> Result<i64>;
    /// All posts, highest id first
    async fn list_posts_desc(&self) -> Result<Vec<Post>>;
    /// Returns the number of rows removed (0 when the id is unknown)
    async fn delete_post(&self, id: i64) -> Result<u64>;
}
