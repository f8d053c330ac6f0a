pub mod blob_store;
pub mod post_store;

pub use blob_store::BlobStore;
pub use post_store::PostStore;
