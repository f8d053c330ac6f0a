pub mod blob_name;
pub mod config;
pub mod error;
pub mod traits;
pub mod types;
pub mod validation;

pub use config::PostboardConfig;
pub use error::{PostboardError, PostboardResult};
pub use traits::{BlobStore, PostStore};
pub use types::{NewPost, Post, PostChanges, PostPage, POSTS_NAMESPACE};
pub use validation::{ImageRules, PostInput, UploadedImage, ValidationErrors};
