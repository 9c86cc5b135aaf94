use async_trait::async_trait;
use keijiban_error::Result;
use std::sync::Arc;

pub use self::{
    in_memory::InMemory as InMemoryPostStore,
    model::{NewPost, Post},
};

mod in_memory;
mod model;

pub type ArcPostStore = Arc<dyn PostStore>;

/// Backing storage of the board
///
/// Operations either complete fully or leave the store untouched.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// All posts, highest ID first
    async fn all_newest_first(&self) -> Result<Vec<Post>>;

    async fn create(&self, new_post: NewPost) -> Result<Post>;

    async fn find(&self, id: i64) -> Result<Option<Post>>;

    /// Returns whether a post was removed
    async fn delete(&self, id: i64) -> Result<bool>;
}
