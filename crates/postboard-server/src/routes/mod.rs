pub mod health;
pub mod posts;
pub mod storage;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;

use crate::state::AppState;
use postboard_core::traits::*;

/// The posts resource, mounted both at the root and under `/api`.
fn post_routes<P, B>() -> axum::Router<AppState<P, B>>
where
    P: PostStore + Clone,
    B: BlobStore + Clone,
{
    axum::Router::new()
        .route(
            "/posts",
            get(posts::index::<P, B>).post(posts::store::<P, B>),
        )
        .route(
            "/posts/{id}",
            get(posts::show::<P, B>)
                .put(posts::update::<P, B>)
                .patch(posts::update::<P, B>)
                .delete(posts::destroy::<P, B>),
        )
}

pub fn build_router<P, B>(state: AppState<P, B>) -> axum::Router
where
    P: PostStore + Clone,
    B: BlobStore + Clone,
{
    let body_limit = state.config.server.body_limit_bytes;

    axum::Router::new()
        // Health
        .route("/_health", get(health::health_check))
        // Posts
        .merge(post_routes::<P, B>())
        .nest("/api", post_routes::<P, B>())
        // Public image links
        .route("/storage/posts/{name}", get(storage::post_image::<P, B>))
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Multipart uploads obey axum's own limit; align it with the outer one.
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(tower_http::limit::RequestBodyLimitLayer::new(body_limit))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
