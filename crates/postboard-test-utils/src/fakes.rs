//! In-memory stores for exercising the post manager without SQLite or disk.
//! Each can be told to fail its writes to drive error and cleanup paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use postboard_core::{
    BlobStore, NewPost, Post, PostChanges, PostPage, PostStore, PostboardError, PostboardResult,
    blob_name,
};

#[derive(Default)]
struct PostTable {
    next_id: i64,
    rows: Vec<Post>,
}

#[derive(Clone, Default)]
pub struct MemoryPostStore {
    table: Arc<Mutex<PostTable>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make create/update/delete fail with a persistence error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.table.lock().unwrap().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_writable(&self) -> PostboardResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(PostboardError::Persistence("injected write failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn list_posts(&self, page: u32, per_page: u32) -> PostboardResult<PostPage> {
        let page = page.max(1);
        let mut rows = self.table.lock().unwrap().rows.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let total = rows.len() as u64;
        let items = rows
            .into_iter()
            .skip(((page - 1) * per_page) as usize)
            .take(per_page as usize)
            .collect();
        Ok(PostPage {
            items,
            total,
            page,
            per_page,
        })
    }

    async fn create_post(&self, input: &NewPost) -> PostboardResult<Post> {
        self.check_writable()?;
        let mut table = self.table.lock().unwrap();
        table.next_id += 1;
        let now = chrono::Utc::now();
        let post = Post {
            id: table.next_id,
            title: input.title.clone(),
            content: input.content.clone(),
            image: input.image.clone(),
            created_at: now,
            updated_at: now,
        };
        table.rows.push(post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: i64) -> PostboardResult<Option<Post>> {
        let table = self.table.lock().unwrap();
        Ok(table.rows.iter().find(|p| p.id == id).cloned())
    }

    async fn update_post(&self, id: i64, changes: &PostChanges) -> PostboardResult<Post> {
        self.check_writable()?;
        let mut table = self.table.lock().unwrap();
        let post = table
            .rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(PostboardError::post_not_found)?;
        post.title = changes.title.clone();
        post.content = changes.content.clone();
        if let Some(image) = &changes.image {
            post.image = image.clone();
        }
        post.updated_at = chrono::Utc::now();
        Ok(post.clone())
    }

    async fn delete_post(&self, id: i64) -> PostboardResult<()> {
        self.check_writable()?;
        let mut table = self.table.lock().unwrap();
        let before = table.rows.len();
        table.rows.retain(|p| p.id != id);
        if table.rows.len() == before {
            return Err(PostboardError::post_not_found());
        }
        Ok(())
    }
}

type BlobKey = (String, String);

#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<Mutex<HashMap<BlobKey, (Bytes, String)>>>,
    fail_store: Arc<AtomicBool>,
    fail_delete: Arc<AtomicBool>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_store(&self, fail: bool) {
        self.fail_store.store(fail, Ordering::SeqCst);
    }

    pub fn fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, namespace: &str, name: &str) -> bool {
        self.blobs
            .lock()
            .unwrap()
            .contains_key(&(namespace.to_string(), name.to_string()))
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn store(&self, namespace: &str, data: Bytes, mime_type: &str) -> PostboardResult<String> {
        if self.fail_store.load(Ordering::SeqCst) {
            return Err(PostboardError::Storage("injected store failure".to_string()));
        }
        let name = blob_name::generate(&data, mime_type);
        self.blobs.lock().unwrap().insert(
            (namespace.to_string(), name.clone()),
            (data, mime_type.to_string()),
        );
        Ok(name)
    }

    async fn get(&self, namespace: &str, name: &str) -> PostboardResult<Option<(Bytes, String)>> {
        let blobs = self.blobs.lock().unwrap();
        Ok(blobs.get(&(namespace.to_string(), name.to_string())).cloned())
    }

    async fn exists(&self, namespace: &str, name: &str) -> PostboardResult<bool> {
        Ok(self.contains(namespace, name))
    }

    async fn delete(&self, namespace: &str, name: &str) -> PostboardResult<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(PostboardError::Storage("injected delete failure".to_string()));
        }
        self.blobs
            .lock()
            .unwrap()
            .remove(&(namespace.to_string(), name.to_string()));
        Ok(())
    }
}
