//! In-memory store using DashMap (test double for the SQLite database)

use super::{PostRecord, PostStore, Result, StorageError, UserStore};
use async_trait::async_trait;
use blog_types::{Post, User};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

/// Process-local store with the same contract as [`super::Database`]
#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<String, User>,
    posts: DashMap<i64, Post>,
    next_user_id: AtomicI64,
    next_post_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.get(email).map(|u| u.value().clone()))
    }

    async fn insert_user(&self, email: &str, password: &str) -> Result<i64> {
        // Entry holds the shard lock, so check-and-insert is atomic
        match self.users.entry(email.to_string()) {
            Entry::Occupied(_) => Err(StorageError::Duplicate(email.to_string())),
            Entry::Vacant(slot) => {
                let id = self.next_user_id.fetch_add(1, Ordering::SeqCst) + 1;
                slot.insert(User {
                    id,
                    email: email.to_string(),
                    password: password.to_string(),
                });
                Ok(id)
            }
        }
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn insert_post(&self, post: &PostRecord) -> Result<i64> {
        let id = self.next_post_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.posts.insert(id, post.clone().into_post(id));
        Ok(id)
    }

    async fn list_posts_desc(&self) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self.posts.iter().map(|p| p.value().clone()).collect();
        posts.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(posts)
    }

    async fn delete_post(&self, id: i64) -> Result<u64> {
        Ok(self.posts.remove(&id).map_or(0, |_| 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> PostRecord {
        PostRecord {
            title: title.to_string(),
            content: String::new(),
            author: String::new(),
            category: "general".to_string(),
            image: None,
            date: String::new(),
        }
    }

    #[tokio::test]
    async fn test_user_uniqueness() {
        let store = MemoryStore::new();

        assert_eq!(store.insert_user("a@b.c", "pw").await.unwrap(), 1);
        assert!(matches!(
            store.insert_user("a@b.c", "other").await,
            Err(StorageError::Duplicate(_))
        ));
        assert_eq!(store.insert_user("d@e.f", "pw").await.unwrap(), 2);

        let user = store.find_user_by_email("a@b.c").await.unwrap().unwrap();
        assert_eq!(user.password, "pw");
        assert!(store.find_user_by_email("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let store = MemoryStore::new();

        let first = store.insert_post(&record("1")).await.unwrap();
        store.delete_post(first).await.unwrap();
        let second = store.insert_post(&record("2")).await.unwrap();
        assert!(second > first);

        let posts = store.list_posts_desc().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "2");
    }

    #[test]
    fn test_delete_unknown_id() {
        let store = MemoryStore::new();
        let removed = tokio_test::block_on(store.delete_post(42));
        assert_eq!(tokio_test::assert_ok!(removed), 0);
    }
}
