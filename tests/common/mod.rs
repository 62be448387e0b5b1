//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests against a mock Gemini API.

#![allow(dead_code)]

use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use venosim_providers::DEFAULT_MODEL;

/// Start a mock server that simulates the Gemini API
pub async fn start_gemini_mock() -> MockServer {
    MockServer::start().await
}

/// Path for the default model's generateContent endpoint
pub fn generate_path() -> String {
    format!("/models/{DEFAULT_MODEL}:generateContent")
}

/// Mount a structured-output reply carrying the given explanation fields
pub async fn mount_explanation(server: &MockServer, title: &str, content: &str, severity: &str) {
    let explanation = serde_json::json!({
        "title": title,
        "content": content,
        "warningLevel": severity,
    });
    let body = serde_json::json!({
        "candidates": [{
            "content": {
                "parts": [{ "text": explanation.to_string() }],
                "role": "model"
            },
            "finishReason": "STOP"
        }]
    });

    Mock::given(method("POST"))
        .and(path(generate_path()))
        .and(header_exists("x-goog-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount an error status for the generateContent endpoint
pub async fn mount_error(server: &MockServer, status: u16) {
    let body = serde_json::json!({
        "error": { "code": status, "message": "simulated failure", "status": "UNAVAILABLE" }
    });

    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a 200 reply whose payload is not a valid explanation
pub async fn mount_garbage(server: &MockServer) {
    let body = serde_json::json!({
        "candidates": [{
            "content": {
                "parts": [{ "text": "not json at all" }],
                "role": "model"
            }
        }]
    });

    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
