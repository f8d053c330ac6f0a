use axum::extract::{OriginalUri, Path, Query, State};
use serde::Deserialize;

use crate::envelope::{Envelope, PaginatedPosts};
use crate::error::ApiError;
use crate::extract::PostForm;
use crate::state::AppState;
use postboard_core::traits::*;
use postboard_core::{Post, PostboardError};

#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<String>,
}

/// Anything that is not a positive integer selects the first page.
fn page_number(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}

/// Non-numeric ids can never match a post.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| PostboardError::post_not_found().into())
}

// ---------------------------------------------------------------------------
// GET /posts
// ---------------------------------------------------------------------------

pub async fn index<P, B>(
    State(state): State<AppState<P, B>>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<ListPostsQuery>,
) -> Result<Envelope<PaginatedPosts>, ApiError>
where
    P: PostStore,
    B: BlobStore,
{
    let page = state.posts.list(page_number(params.page.as_deref())).await?;
    let path = format!(
        "{}{}",
        state.config.public_url.trim_end_matches('/'),
        uri.path()
    );
    Ok(Envelope::ok("List Data Posts", PaginatedPosts::new(page, path)))
}

// ---------------------------------------------------------------------------
// POST /posts
// ---------------------------------------------------------------------------

pub async fn store<P, B>(
    State(state): State<AppState<P, B>>,
    PostForm(input): PostForm,
) -> Result<Envelope<Post>, ApiError>
where
    P: PostStore,
    B: BlobStore,
{
    let post = state.posts.create(&input).await?;
    Ok(Envelope::ok("Data Post Berhasil Ditambahkan!", post))
}

// ---------------------------------------------------------------------------
// GET /posts/{id}
// ---------------------------------------------------------------------------

pub async fn show<P, B>(
    State(state): State<AppState<P, B>>,
    Path(id): Path<String>,
) -> Result<Envelope<Post>, ApiError>
where
    P: PostStore,
    B: BlobStore,
{
    let post = state.posts.show(parse_id(&id)?).await?;
    Ok(Envelope::ok("Detail Data Post!", post))
}

// ---------------------------------------------------------------------------
// PUT /posts/{id}
// ---------------------------------------------------------------------------

pub async fn update<P, B>(
    State(state): State<AppState<P, B>>,
    Path(id): Path<String>,
    PostForm(input): PostForm,
) -> Result<Envelope<Post>, ApiError>
where
    P: PostStore,
    B: BlobStore,
{
    let post = state.posts.update(parse_id(&id)?, &input).await?;
    Ok(Envelope::ok("Data Post Berhasil Diubah!", post))
}

// ---------------------------------------------------------------------------
// DELETE /posts/{id}
// ---------------------------------------------------------------------------

pub async fn destroy<P, B>(
    State(state): State<AppState<P, B>>,
    Path(id): Path<String>,
) -> Result<Envelope<()>, ApiError>
where
    P: PostStore,
    B: BlobStore,
{
    state.posts.destroy(parse_id(&id)?).await?;
    Ok(Envelope::empty("Data Post Berhasil Dihapus!"))
}
