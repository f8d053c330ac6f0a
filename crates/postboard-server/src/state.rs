use std::sync::Arc;

use postboard_core::config::PostboardConfig;
use postboard_core::traits::*;

use crate::manager::PostManager;

#[derive(Clone)]
pub struct AppState<P, B>
where
    P: PostStore,
    B: BlobStore,
{
    pub posts: Arc<PostManager<P, B>>,
    pub config: Arc<PostboardConfig>,
}

impl<P, B> AppState<P, B>
where
    P: PostStore,
    B: BlobStore,
{
    pub fn new(post_store: Arc<P>, blob_store: Arc<B>, config: PostboardConfig) -> Self {
        let posts = PostManager::new(post_store, blob_store, &config.posts);
        Self {
            posts: Arc::new(posts),
            config: Arc::new(config),
        }
    }
}
