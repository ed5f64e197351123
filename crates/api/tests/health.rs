//! Integration tests for the root-level routes and general HTTP behaviour.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, body_string, fresh_app, get, TEST_ORIGIN};
use devices_api::config::ServerConfig;
use devices_api::router::build_app_router;
use devices_api::state::AppState;
use devices_core::memory::InMemoryDeviceRepository;
use devices_core::repository::DeviceService;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test: GET / returns the greeting verbatim
// ---------------------------------------------------------------------------

#[tokio::test]
async fn root_returns_hello_world() {
    let (app, _repo) = fresh_app();
    let response = get(app, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, r#"{"message":"Hello World"}"#);
}

// ---------------------------------------------------------------------------
// Test: GET /health returns the storage health map
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_up_with_stats() {
    let (app, _repo) = fresh_app();
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "up");
    assert_eq!(json["message"], "It's healthy");
    assert_eq!(json["open_connections"], "0");
    assert!(json["wait_count"].is_string());
    assert!(json["max_lifetime_closed"].is_string());
}

#[tokio::test]
async fn health_reports_down_after_close() {
    let (app, repo) = fresh_app();
    repo.close().await.unwrap();

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "down");
    assert!(json["error"].as_str().unwrap().starts_with("db down:"));
}

// ---------------------------------------------------------------------------
// Test: OpenAPI document lists the device routes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn swagger_json_describes_device_routes() {
    let (app, _repo) = fresh_app();
    let response = get(app, "/swagger.json").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let paths = &json["paths"];
    for path in [
        "/api/v1/devices/new",
        "/api/v1/devices/all",
        "/api/v1/devices/{id}",
        "/api/v1/devices/brand/{brand}",
        "/api/v1/devices/state/{state}",
        "/api/v1/devices/update/{id}",
        "/api/v1/devices/delete",
    ] {
        assert!(paths.get(path).is_some(), "missing path {path}");
    }
    assert!(json["components"]["schemas"]["Device"].is_object());
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let (app, _repo) = fresh_app();
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let (app, _repo) = fresh_app();
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");

    // The value should be a UUID (36 chars with hyphens).
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

// ---------------------------------------------------------------------------
// Test: CORS
// ---------------------------------------------------------------------------

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/devices/all")
        .header("Origin", origin)
        .header("Access-Control-Request-Method", "GET")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin_without_credentials() {
    let (app, _repo) = fresh_app();
    let response = app.oneshot(preflight(TEST_ORIGIN)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], TEST_ORIGIN);
    assert!(headers.get("access-control-allow-credentials").is_none());

    let allowed = headers["access-control-allow-headers"].to_str().unwrap();
    assert!(!allowed.to_ascii_lowercase().contains("authorization"));
}

#[tokio::test]
async fn cors_preflight_ignores_unlisted_origin() {
    let (app, _repo) = fresh_app();
    let response = app
        .oneshot(preflight("https://elsewhere.example"))
        .await
        .unwrap();

    assert!(response.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn default_config_allows_any_origin() {
    let config = ServerConfig::from_lookup(|_| None).unwrap();
    let app = build_app_router(
        AppState {
            repo: Arc::new(InMemoryDeviceRepository::new()),
        },
        &config,
    );

    let response = app
        .oneshot(preflight("https://elsewhere.example"))
        .await
        .unwrap();
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}
