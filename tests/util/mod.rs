//! Helpers for driving the full application router in integration tests.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use foodgram::server::{model::app::AppState, router};
use foodgram_test_utils::prelude::*;
use serde_json::Value;
use tower::ServiceExt;

/// Smallest payload that passes the PNG signature check
pub fn png_data_url() -> String {
    format!(
        "data:image/png;base64,{}",
        STANDARD.encode(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR")
    )
}

pub trait TestContextExt {
    /// Application router backed by the test database and media directory
    fn app(&self) -> Router;
}

impl TestContextExt for TestContext {
    fn app(&self) -> Router {
        let state: AppState = self.to_app_state();
        router::app(state)
    }
}

/// Builds a request with an optional token and JSON body
pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Token {}", token));
    }

    let body = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    builder.body(body).unwrap()
}

/// Sends the request and returns the status with the body parsed as JSON, `Value::Null`
/// for empty or non-JSON bodies
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send_raw(app, request).await;

    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

pub async fn send_raw(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, bytes.to_vec())
}
