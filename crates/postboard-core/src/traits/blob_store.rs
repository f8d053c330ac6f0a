use async_trait::async_trait;
use bytes::Bytes;

use crate::error::PostboardResult;

#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    /// Write `data` under a freshly generated name and return that name.
    async fn store(&self, namespace: &str, data: Bytes, mime_type: &str) -> PostboardResult<String>;
    async fn get(&self, namespace: &str, name: &str) -> PostboardResult<Option<(Bytes, String)>>;
    async fn exists(&self, namespace: &str, name: &str) -> PostboardResult<bool>;
    /// Remove a blob. A missing blob is not an error.
    async fn delete(&self, namespace: &str, name: &str) -> PostboardResult<()>;
}
