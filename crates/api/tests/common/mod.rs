#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderValue, Method, Request};
use axum::response::Response;
use axum::Router;
use devices_core::memory::InMemoryDeviceRepository;
use http_body_util::BodyExt;
use tower::ServiceExt;

use devices_api::config::{CorsOrigins, ServerConfig};
use devices_api::router::build_app_router;
use devices_api::state::AppState;

/// Server configuration for tests: one allowed origin and a 30s timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        cors_origins: CorsOrigins::List(vec![HeaderValue::from_static(TEST_ORIGIN)]),
        request_timeout: Duration::from_secs(30),
    }
}

/// Origin accepted by [`test_config`].
pub const TEST_ORIGIN: &str = "https://inventory.example";

/// Build the full application router over the given in-memory repository.
///
/// Uses the same builder as `main.rs`, so tests exercise the production
/// middleware stack. Keep a handle on `repo` to inspect storage directly.
pub fn build_test_app(repo: Arc<InMemoryDeviceRepository>) -> Router {
    build_app_router(AppState { repo }, &test_config())
}

/// Build a router over a fresh, empty repository.
pub fn fresh_app() -> (Router, Arc<InMemoryDeviceRepository>) {
    let repo = Arc::new(InMemoryDeviceRepository::new());
    (build_test_app(Arc::clone(&repo)), repo)
}

async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::DELETE, uri, Some(body)).await
}

/// Read the full response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read the full response body as a string.
pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
