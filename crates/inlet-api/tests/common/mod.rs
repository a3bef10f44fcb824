//! Shared helpers for router-level tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use inlet_api::{crypto::SigningSecret, AppState};
use inlet_testing::{TestEnv, TEST_SECRET};
use serde_json::Value;

/// Application state over `env` signed with [`TEST_SECRET`].
pub fn state(env: &TestEnv) -> AppState {
    state_with_secret(env, SigningSecret::new(TEST_SECRET))
}

/// Application state over `env` with an explicit secret.
pub fn state_with_secret(env: &TestEnv, secret: SigningSecret) -> AppState {
    AppState::new(env.storage().clone(), env.metrics.clone(), env.clock_handle(), secret)
}

/// Router over `env` signed with [`TEST_SECRET`].
pub fn router(env: &TestEnv) -> Router {
    inlet_api::create_router(state(env))
}

/// POST `/webhook` with a valid signature over `body`.
pub fn signed_webhook(body: &[u8]) -> Request<Body> {
    let signature = SigningSecret::new(TEST_SECRET).sign(body).expect("sign body");
    webhook_with_signature(body, Some(&signature))
}

/// POST `/webhook` with the given signature header, or none.
pub fn webhook_with_signature(body: &[u8], signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header("x-signature", signature);
    }
    builder.body(Body::from(body.to_vec())).expect("build request")
}

/// GET `uri` with an empty body.
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).expect("build request")
}

/// Reads a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

/// Reads a response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    String::from_utf8(bytes.to_vec()).expect("response body should be UTF-8")
}
