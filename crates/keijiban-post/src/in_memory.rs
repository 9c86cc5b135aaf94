use crate::{NewPost, Post, PostStore};
use async_trait::async_trait;
use keijiban_error::Result;
use std::collections::BTreeMap;
use time::OffsetDateTime;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    last_id: i64,
    posts: BTreeMap<i64, Post>,
}

/// Post store living in process memory
///
/// IDs start at 1 and are never reused, even after deletion.
#[derive(Default)]
pub struct InMemory {
    inner: RwLock<Inner>,
}

impl InMemory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for InMemory {
    async fn all_newest_first(&self) -> Result<Vec<Post>> {
        let guard = self.inner.read().await;
        Ok(guard.posts.values().rev().cloned().collect())
    }

    async fn create(&self, new_post: NewPost) -> Result<Post> {
        let mut guard = self.inner.write().await;
        guard.last_id += 1;

        let now = OffsetDateTime::now_utc();
        let post = Post {
            id: guard.last_id,
            content: new_post.content,
            tracking_cookie: new_post.tracking_cookie,
            posted_by: new_post.posted_by,
            created_at: now,
            updated_at: now,
        };
        guard.posts.insert(post.id, post.clone());

        Ok(post)
    }

    async fn find(&self, id: i64) -> Result<Option<Post>> {
        let guard = self.inner.read().await;
        Ok(guard.posts.get(&id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut guard = self.inner.write().await;
        Ok(guard.posts.remove(&id).is_some())
    }
}
