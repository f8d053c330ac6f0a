use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use postboard_core::{Post, PostPage};

/// Uniform response body: `{ success, message, data }`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    /// Success with `data: null`.
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// A page of posts with length-aware paginator metadata.
#[derive(Debug, Serialize)]
pub struct PaginatedPosts {
    pub current_page: u32,
    pub data: Vec<Post>,
    pub first_page_url: String,
    pub from: Option<u64>,
    pub last_page: u32,
    pub last_page_url: String,
    pub next_page_url: Option<String>,
    pub path: String,
    pub per_page: u32,
    pub prev_page_url: Option<String>,
    pub to: Option<u64>,
    pub total: u64,
}

impl PaginatedPosts {
    /// `path` is the absolute listing URL without a query string.
    pub fn new(page: PostPage, path: String) -> Self {
        let url = |n: u32| format!("{path}?page={n}");
        let last_page = page.last_page();
        let current = page.page;
        Self {
            first_page_url: url(1),
            from: page.from(),
            to: page.to(),
            last_page,
            last_page_url: url(last_page),
            next_page_url: (current < last_page).then(|| url(current + 1)),
            prev_page_url: (current > 1).then(|| url(current - 1)),
            per_page: page.per_page,
            total: page.total,
            current_page: current,
            data: page.items,
            path,
        }
    }
}
