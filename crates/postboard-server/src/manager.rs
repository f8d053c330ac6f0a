//! Post operations over injected record and blob stores. An image is always
//! written before the record that names it.

use std::sync::Arc;

use bytes::Bytes;

use postboard_core::config::PostsConfig;
use postboard_core::traits::*;
use postboard_core::validation::{ImageRules, RuleSet};
use postboard_core::{
    NewPost, POSTS_NAMESPACE, Post, PostChanges, PostInput, PostPage, PostboardError,
    PostboardResult,
};

pub struct PostManager<P, B>
where
    P: PostStore,
    B: BlobStore,
{
    post_store: Arc<P>,
    blob_store: Arc<B>,
    create_rules: RuleSet,
    update_rules: RuleSet,
    per_page: u32,
}

impl<P, B> PostManager<P, B>
where
    P: PostStore,
    B: BlobStore,
{
    pub fn new(post_store: Arc<P>, blob_store: Arc<B>, config: &PostsConfig) -> Self {
        let image_rules = ImageRules::new(config.max_image_kb);
        let update_image_rules = config.validate_image_on_update.then_some(&image_rules);
        Self {
            create_rules: RuleSet::create(&image_rules),
            update_rules: RuleSet::update(update_image_rules),
            per_page: config.per_page.max(1),
            post_store,
            blob_store,
        }
    }

    pub async fn list(&self, page: u32) -> PostboardResult<PostPage> {
        self.post_store.list_posts(page, self.per_page).await
    }

    pub async fn create(&self, input: &PostInput) -> PostboardResult<Post> {
        self.create_rules.validate(input)?;
        let Some(upload) = input.image() else {
            return Err(PostboardError::InternalError(
                "validated create payload has no image".to_string(),
            ));
        };

        let image = self
            .blob_store
            .store(POSTS_NAMESPACE, upload.data.clone(), &upload.mime_type())
            .await?;

        let new_post = NewPost {
            title: input.title().unwrap_or_default().to_string(),
            content: input.content().unwrap_or_default().to_string(),
            image: image.clone(),
        };
        match self.post_store.create_post(&new_post).await {
            Ok(post) => {
                tracing::info!(id = post.id, image = %post.image, "created post");
                Ok(post)
            }
            Err(e) => {
                self.discard_blob(&image).await;
                Err(e)
            }
        }
    }

    pub async fn show(&self, id: i64) -> PostboardResult<Post> {
        self.find(id).await
    }

    /// Replaces title and content. A supplied image is stored first, the
    /// record is pointed at it, and only then is the previous image removed.
    pub async fn update(&self, id: i64, input: &PostInput) -> PostboardResult<Post> {
        self.update_rules.validate(input)?;
        let current = self.find(id).await?;

        let title = input.title().unwrap_or_default().to_string();
        let content = input.content().unwrap_or_default().to_string();

        let Some(upload) = input.image() else {
            let post = self
                .post_store
                .update_post(
                    id,
                    &PostChanges {
                        title,
                        content,
                        image: None,
                    },
                )
                .await?;
            tracing::info!(id, "updated post");
            return Ok(post);
        };

        let image = self
            .blob_store
            .store(POSTS_NAMESPACE, upload.data.clone(), &upload.mime_type())
            .await?;

        let changes = PostChanges {
            title,
            content,
            image: Some(image.clone()),
        };
        let post = match self.post_store.update_post(id, &changes).await {
            Ok(post) => post,
            Err(e) => {
                self.discard_blob(&image).await;
                return Err(e);
            }
        };

        // The record is committed; a failed delete only orphans the old file.
        if let Err(e) = self.blob_store.delete(POSTS_NAMESPACE, &current.image).await {
            tracing::warn!("Failed to delete replaced image {} of post {id}: {e}", current.image);
        }

        tracing::info!(id, image = %post.image, "updated post with new image");
        Ok(post)
    }

    pub async fn destroy(&self, id: i64) -> PostboardResult<()> {
        let post = self.find(id).await?;
        self.blob_store.delete(POSTS_NAMESPACE, &post.image).await?;
        self.post_store.delete_post(id).await?;
        tracing::info!(id, "deleted post");
        Ok(())
    }

    /// Fetch a stored post image by blob name.
    pub async fn image(&self, name: &str) -> PostboardResult<Option<(Bytes, String)>> {
        self.blob_store.get(POSTS_NAMESPACE, name).await
    }

    async fn find(&self, id: i64) -> PostboardResult<Post> {
        self.post_store
            .get_post(id)
            .await?
            .ok_or_else(PostboardError::post_not_found)
    }

    /// Best-effort removal of a blob whose record write failed.
    async fn discard_blob(&self, name: &str) {
        if let Err(e) = self.blob_store.delete(POSTS_NAMESPACE, name).await {
            tracing::warn!("Failed to clean up orphaned image {name}: {e}");
        }
    }
}
