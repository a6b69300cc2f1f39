//! Post service

use crate::error::{AppError, Result};
use crate::storage::{PostRecord, PostStore};
use blog_types::{NewPost, Post};
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use tracing::info;

pub struct PostService {
    posts: Arc<dyn PostStore>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostStore>) -> Self {
        Self { posts }
    }

    /// Store a post stamped with the current instant and return it with its id.
    pub async fn create(&self, new_post: NewPost) -> Result<Post> {
        let record = PostRecord {
            category: new_post.resolved_category(),
            image: new_post.resolved_image(),
            title: new_post.title,
            content: new_post.content,
            author: new_post.author,
            date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        let id = self
            .posts
            .insert_post(&record)
            .await
            .map_err(AppError::storage("Upload failed"))?;

        info!("Saved post {}: {}", id, record.title);
        Ok(record.into_post(id))
    }

    /// Every post, newest first. Unbounded.
    pub async fn list(&self) -> Result<Vec<Post>> {
        self.posts
            .list_posts_desc()
            .await
            .map_err(AppError::storage("Failed to load posts"))
    }

    /// Succeeds whether or not a row matched.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let removed = self
            .posts
            .delete_post(id)
            .await
            .map_err(AppError::storage("Failed to delete post"))?;

        info!("Deleted post {} ({} row(s))", id, removed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use blog_types::DEFAULT_CATEGORY;

    fn service() -> PostService {
        PostService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let posts = service();
        let post = posts
            .create(NewPost::new("Hello", "World", "a@example.com"))
            .await
            .unwrap();

        assert_eq!(post.id, 1);
        assert_eq!(post.category, DEFAULT_CATEGORY);
        assert_eq!(post.image, None);
        assert!(chrono::DateTime::parse_from_rfc3339(&post.date).is_ok());
        assert!(post.date.ends_with('Z'));
    }

    #[tokio::test]
    async fn test_create_keeps_given_category_and_image() {
        let posts = service();
        let post = posts
            .create(
                NewPost::new("t", "c", "a")
                    .with_category("food")
                    .with_image("https://example.com/x.jpg"),
            )
            .await
            .unwrap();

        assert_eq!(post.category, "food");
        assert_eq!(post.image.as_deref(), Some("https://example.com/x.jpg"));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let posts = service();
        for title in ["one", "two", "three"] {
            posts.create(NewPost::new(title, "", "")).await.unwrap();
        }

        let ids: Vec<i64> = posts.list().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let posts = service();
        let post = posts.create(NewPost::new("t", "c", "a")).await.unwrap();

        posts.delete(999).await.unwrap();
        assert_eq!(posts.list().await.unwrap().len(), 1);

        posts.delete(post.id).await.unwrap();
        posts.delete(post.id).await.unwrap();
        assert!(posts.list().await.unwrap().is_empty());
    }
}
