use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use postboard_core::{PostboardError, ValidationErrors};

use crate::envelope::Envelope;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Set for 422 responses; the body is then the field -> messages map.
    pub violations: Option<ValidationErrors>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            violations: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn validation(errors: ValidationErrors) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "validation failed".to_string(),
            violations: Some(errors),
        }
    }

    fn internal(err: &PostboardError) -> Self {
        tracing::error!("request failed: {err}");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.violations {
            Some(errors) => (self.status, axum::Json(errors)).into_response(),
            None => (self.status, axum::Json(Envelope::failure(self.message))).into_response(),
        }
    }
}

impl From<PostboardError> for ApiError {
    fn from(err: PostboardError) -> Self {
        match err {
            PostboardError::Validation(errors) => ApiError::validation(errors),
            PostboardError::NotFound(message) => ApiError::not_found(message),
            PostboardError::InvalidRequest(message) => ApiError::bad_request(message),
            other @ (PostboardError::Storage(_)
            | PostboardError::Persistence(_)
            | PostboardError::InternalError(_)) => ApiError::internal(&other),
        }
    }
}
