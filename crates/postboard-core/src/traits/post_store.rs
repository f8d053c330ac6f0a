use async_trait::async_trait;

use crate::error::PostboardResult;
use crate::types::{NewPost, Post, PostChanges, PostPage};

#[async_trait]
pub trait PostStore: Send + Sync + 'static {
    /// Newest first. `page` is 1-based; values below 1 are read as 1.
    async fn list_posts(&self, page: u32, per_page: u32) -> PostboardResult<PostPage>;
    async fn create_post(&self, input: &NewPost) -> PostboardResult<Post>;
    async fn get_post(&self, id: i64) -> PostboardResult<Option<Post>>;
    /// Fails with `NotFound` when no post has this id.
    async fn update_post(&self, id: i64, changes: &PostChanges) -> PostboardResult<Post>;
    /// Fails with `NotFound` when no post has this id.
    async fn delete_post(&self, id: i64) -> PostboardResult<()>;
}
