use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};

use postboard_core::{BlobStore, PostboardError, PostboardResult, blob_name};

#[derive(Clone)]
pub struct FsBlobStore {
    base_path: PathBuf,
}

impl FsBlobStore {
    pub fn new(path: &str) -> PostboardResult<Self> {
        let base_path = PathBuf::from(path);
        std::fs::create_dir_all(&base_path).map_err(|e| {
            PostboardError::Storage(format!("failed to create blob directory: {e}"))
        })?;
        Ok(Self { base_path })
    }

    /// Return the namespace directory: {base_path}/{namespace}/
    fn namespace_dir(&self, namespace: &str) -> PathBuf {
        self.base_path.join(namespace)
    }

    /// Return the blob file path: {base_path}/{namespace}/{name}
    fn blob_path(&self, namespace: &str, name: &str) -> PathBuf {
        self.namespace_dir(namespace).join(name)
    }

    /// Return the metadata file path: {base_path}/{namespace}/{name}.meta
    fn meta_path(&self, namespace: &str, name: &str) -> PathBuf {
        self.namespace_dir(namespace).join(format!("{name}.meta"))
    }

    fn check_namespace(namespace: &str) -> PostboardResult<()> {
        if blob_name::is_valid(namespace) {
            Ok(())
        } else {
            Err(PostboardError::InvalidRequest(format!(
                "invalid blob namespace: {namespace}"
            )))
        }
    }
}

/// Remove a file, treating NotFound as success.
async fn remove_if_present(path: &Path, what: &str) -> PostboardResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PostboardError::Storage(format!("failed to delete {what}: {e}"))),
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn store(&self, namespace: &str, data: Bytes, mime_type: &str) -> PostboardResult<String> {
        Self::check_namespace(namespace)?;
        let dir = self.namespace_dir(namespace);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            PostboardError::Storage(format!("failed to create namespace directory: {e}"))
        })?;

        let name = blob_name::generate(&data, mime_type);

        let blob_path = self.blob_path(namespace, &name);
        tokio::fs::write(&blob_path, &data)
            .await
            .map_err(|e| PostboardError::Storage(format!("failed to write blob: {e}")))?;

        let meta_path = self.meta_path(namespace, &name);
        if let Err(e) = tokio::fs::write(&meta_path, mime_type.as_bytes()).await {
            // Don't leave a data file without its sidecar behind.
            let _ = tokio::fs::remove_file(&blob_path).await;
            return Err(PostboardError::Storage(format!(
                "failed to write blob metadata: {e}"
            )));
        }

        tracing::debug!(namespace, %name, size = data.len(), "stored blob");
        Ok(name)
    }

    async fn get(&self, namespace: &str, name: &str) -> PostboardResult<Option<(Bytes, String)>> {
        if !blob_name::is_valid(namespace) || !blob_name::is_valid(name) {
            return Ok(None);
        }
        let blob_path = self.blob_path(namespace, name);
        let meta_path = self.meta_path(namespace, name);

        let data = match tokio::fs::read(&blob_path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PostboardError::Storage(format!("failed to read blob: {e}")));
            }
        };

        let mime_type = match tokio::fs::read_to_string(&meta_path).await {
            Ok(mime) => mime,
            // Data written without a sidecar; serve it as opaque bytes.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                "application/octet-stream".to_string()
            }
            Err(e) => {
                return Err(PostboardError::Storage(format!(
                    "failed to read blob metadata: {e}"
                )));
            }
        };

        Ok(Some((Bytes::from(data), mime_type)))
    }

    async fn exists(&self, namespace: &str, name: &str) -> PostboardResult<bool> {
        if !blob_name::is_valid(namespace) || !blob_name::is_valid(name) {
            return Ok(false);
        }
        let blob_path = self.blob_path(namespace, name);
        match tokio::fs::metadata(&blob_path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(PostboardError::Storage(format!(
                "failed to check blob existence: {e}"
            ))),
        }
    }

    async fn delete(&self, namespace: &str, name: &str) -> PostboardResult<()> {
        if !blob_name::is_valid(namespace) || !blob_name::is_valid(name) {
            tracing::debug!(namespace, name, "skipping delete of invalid blob name");
            return Ok(());
        }
        remove_if_present(&self.blob_path(namespace, name), "blob").await?;
        remove_if_present(&self.meta_path(namespace, name), "blob metadata").await?;
        tracing::debug!(namespace, name, "deleted blob");
        Ok(())
    }
}
