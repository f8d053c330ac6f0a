use axum::extract::{Path, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::IntoResponse;

use crate::error::ApiError;
use crate::state::AppState;
use postboard_core::traits::*;

/// Serve a stored post image by blob name.
pub async fn post_image<P, B>(
    State(state): State<AppState<P, B>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    P: PostStore,
    B: BlobStore,
{
    let (data, mime_type) = state
        .posts
        .image(&name)
        .await?
        .ok_or_else(|| ApiError::not_found("Image not found"))?;

    Ok((
        [
            (CONTENT_TYPE, mime_type),
            (CACHE_CONTROL, "public, max-age=31536000, immutable".to_string()),
        ],
        data,
    ))
}
