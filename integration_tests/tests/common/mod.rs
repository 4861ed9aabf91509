//! Helpers for driving the relay's router against mocked HubSpot and Geoapify.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use httpmock::MockServer;
use tower::ServiceExt;

use shared_lib::env_utils::{AppConfig, GeoapifyConfig, HubspotConfig, DEFAULT_COUNTRY};
use web_service::AppState;

pub const TEST_TOKEN: &str = "test-token";
pub const TEST_API_KEY: &str = "geo-key";

/// Config pointing both upstreams at the same mock server.
pub fn mock_config(server: &MockServer) -> AppConfig {
    AppConfig {
        port: 0,
        hubspot: HubspotConfig {
            token: TEST_TOKEN.to_string(),
            base_url: server.base_url(),
        },
        geoapify: GeoapifyConfig {
            api_key: TEST_API_KEY.to_string(),
            base_url: server.base_url(),
        },
        default_country: DEFAULT_COUNTRY.to_string(),
        allowed_origins: vec!["https://app.hubspot.com".to_string()],
    }
}

pub fn app(server: &MockServer) -> Router {
    let config = mock_config(server);
    web_service::get_app(AppState::from_config(&config), &config.allowed_origins)
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    (status, body.to_vec())
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::get(uri).body(Body::empty()).expect("valid request");
    let (status, body) = send(app, request).await;
    (status, parse(&body))
}

pub async fn post_json(
    app: Router,
    uri: &str,
    payload: impl Into<Body>,
) -> (StatusCode, Vec<u8>) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(payload.into())
        .expect("valid request");
    send(app, request).await
}

pub fn parse(body: &[u8]) -> serde_json::Value {
    serde_json::from_slice(body).unwrap_or(serde_json::Value::Null)
}
