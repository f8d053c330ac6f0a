use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::HeaderMap;
use bytes::Bytes;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use postboard_blob_fs::FsBlobStore;
use postboard_core::config::{
    BlobsConfig, DatabaseConfig, PostboardConfig, PostsConfig, ServerConfig,
};
use postboard_server::{AppState, build_router};
use postboard_storage_sqlite::SqlitePostStore;

use crate::multipart::MultipartBody;
use crate::stores::{TestStores, create_test_stores};

pub const TEST_PUBLIC_URL: &str = "http://test.postboard.local";

pub fn create_test_config() -> PostboardConfig {
    PostboardConfig {
        hostname: "127.0.0.1".to_string(),
        port: 0,
        public_url: TEST_PUBLIC_URL.to_string(),
        database: DatabaseConfig {
            url: String::new(), // not used; stores are pre-connected
        },
        blobs: BlobsConfig { path: None },
        posts: PostsConfig::default(),
        server: ServerConfig::default(),
    }
}

pub fn create_test_app_state(stores: &TestStores) -> AppState<SqlitePostStore, FsBlobStore> {
    AppState::new(
        Arc::new(stores.post_store.clone()),
        Arc::new(stores.blob_store.clone()),
        create_test_config(),
    )
}

pub fn create_test_router(stores: &TestStores) -> Router {
    let state = create_test_app_state(stores);
    build_router(state)
}

pub async fn create_test_router_and_stores() -> (Router, TestStores) {
    let stores = create_test_stores().await;
    let router = create_test_router(&stores);
    (router, stores)
}

fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(bytes)
            .unwrap_or(Value::String(String::from_utf8_lossy(bytes).to_string()))
    }
}

/// Send a request through the router and return (status, raw headers, raw body).
pub async fn send_raw(
    router: &Router,
    method: &str,
    uri: &str,
    content_type: Option<&str>,
    body: Vec<u8>,
) -> (u16, HeaderMap, Bytes) {
    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    let req = builder.body(Body::from(body)).unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status().as_u16();
    let headers = resp.headers().clone();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, headers, bytes)
}

/// Send a request with an optional JSON body and return (status, body_json).
pub async fn send_request(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (u16, Value) {
    let (content_type, bytes) = match body {
        Some(b) => (Some("application/json"), serde_json::to_vec(&b).unwrap()),
        None => (None, Vec::new()),
    };
    let (status, _, bytes) = send_raw(router, method, uri, content_type, bytes).await;
    (status, parse_body(&bytes))
}

/// Send a multipart form and return (status, body_json).
pub async fn send_multipart(
    router: &Router,
    method: &str,
    uri: &str,
    form: &MultipartBody,
) -> (u16, Value) {
    let (status, _, bytes) = send_raw(
        router,
        method,
        uri,
        Some(&form.content_type()),
        form.to_bytes(),
    )
    .await;
    (status, parse_body(&bytes))
}
