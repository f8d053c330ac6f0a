use thiserror::Error;

use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum PostboardError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("persistence error: {0}")]
    Persistence(String),

    /// Carries the client-facing message, e.g. "Post not found".
    #[error("{0}")]
    NotFound(String),

    #[error("validation failed")]
    Validation(ValidationErrors),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl PostboardError {
    pub fn post_not_found() -> Self {
        PostboardError::NotFound("Post not found".to_string())
    }
}

impl From<ValidationErrors> for PostboardError {
    fn from(errors: ValidationErrors) -> Self {
        PostboardError::Validation(errors)
    }
}

pub type PostboardResult<T> = Result<T, PostboardError>;
