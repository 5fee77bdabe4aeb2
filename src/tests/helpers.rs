use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use chrono::Utc;
use cookie::Cookie;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use serde_json::Value;
use std::sync::Once;
use tower::ServiceExt;
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

use crate::db::MemoryStore;
use crate::utils::Config;
use crate::AppState;

pub const TEST_SECRET: &str = "test-signing-secret";

static INIT: Once = Once::new();

/// Initialize logging exactly once
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_target(false)
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_max_level(Level::ERROR)
            .with_span_events(FmtSpan::NONE)
            .init();
    });
}

pub fn test_config() -> Config {
    init_tracing();
    let mut config = Config::new(TEST_SECRET);
    // cheapest cost bcrypt accepts
    config.bcrypt_cost = 4;
    config
}

pub fn create_test_app() -> (Router, AppState) {
    create_test_app_with(test_config())
}

pub fn create_test_app_with(config: Config) -> (Router, AppState) {
    info!("Creating test application");
    let state = AppState::new(config, MemoryStore::new());
    (super::super::create_router(state.clone()), state)
}

/// Sign arbitrary claims with the test secret, bypassing the token service.
pub fn sign<T: Serialize>(claims: &T) -> String {
    encode(&Header::default(), claims, &EncodingKey::from_secret(TEST_SECRET.as_bytes()))
        .expect("Failed to sign test token")
}

/// Timestamp `secs` seconds away from now (negative for the past).
pub fn offset(secs: i64) -> i64 {
    Utc::now().timestamp() + secs
}

pub async fn test_request(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    cookies: Option<&[(&str, &str)]>,
) -> (StatusCode, String, HeaderMap) {
    info!(method = %method, uri = %uri, "Making test request");

    let body = if let Some(json) = body {
        Body::from(serde_json::to_string(&json).unwrap())
    } else {
        Body::empty()
    };

    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    // Add cookies if provided
    if let Some(cookies) = cookies {
        if !cookies.is_empty() {
            let cookie_header = cookies
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join("; ");
            request = request.header("cookie", cookie_header);
        }
    }

    let request = request.body(body).unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = String::from_utf8(
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec(),
    )
    .unwrap();

    info!(status = %status, body = %body, "Test response received");
    (status, body, headers)
}

/// Find a cookie by name among the `set-cookie` headers of a response.
pub fn set_cookie(headers: &HeaderMap, name: &str) -> Option<Cookie<'static>> {
    headers
        .get_all("set-cookie")
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| Cookie::parse(value.to_string()).ok())
        .find(|cookie| cookie.name() == name)
}
