//! Explanation provider tests against a mock Gemini API
//!
//! The provider contract is that `fetch` never fails: a reachable backend
//! yields its structured explanation, everything else yields a built-in
//! fallback for the requested stage.

use venosim_providers::{ExplanationClient, offline_explanation, unavailable_explanation};
use venosim_types::{ApiKey, Severity, Stage};

use crate::common;

fn online_client(base_url: &str) -> ExplanationClient {
    ExplanationClient::new(Some(ApiKey::new("test-key"))).with_base_url(base_url)
}

#[tokio::test]
async fn fetch_returns_backend_explanation() {
    let server = common::start_gemini_mock().await;
    common::mount_explanation(
        &server,
        "Deep Vein Thrombosis",
        "A thrombus has formed behind the incompetent valve.",
        "warning",
    )
    .await;

    let client = online_client(&server.uri());
    let explanation = client.fetch(Stage::ThrombusFormed).await;

    assert_eq!(explanation.title, "Deep Vein Thrombosis");
    assert_eq!(explanation.severity, Severity::Warning);
}

#[tokio::test]
async fn fetch_is_repeatable_for_the_same_stage() {
    let server = common::start_gemini_mock().await;
    common::mount_explanation(&server, "Healthy Veins", "Valves seal correctly.", "info").await;

    let client = online_client(&server.uri());
    let first = client.fetch(Stage::Normal).await;
    let second = client.fetch(Stage::Normal).await;

    assert_eq!(first.title, second.title);
    assert_eq!(first.severity, second.severity);
}

#[tokio::test]
async fn server_error_falls_back_without_failing() {
    let server = common::start_gemini_mock().await;
    common::mount_error(&server, 500).await;

    let client = online_client(&server.uri());
    let explanation = client.fetch(Stage::Detaching).await;

    assert_eq!(explanation, unavailable_explanation(Stage::Detaching));
}

#[tokio::test]
async fn rate_limit_falls_back_without_failing() {
    let server = common::start_gemini_mock().await;
    common::mount_error(&server, 429).await;

    let client = online_client(&server.uri());
    let explanation = client.fetch(Stage::Varicose).await;

    assert_eq!(explanation, unavailable_explanation(Stage::Varicose));
}

#[tokio::test]
async fn malformed_payload_falls_back() {
    let server = common::start_gemini_mock().await;
    common::mount_garbage(&server).await;

    let client = online_client(&server.uri());
    let explanation = client.fetch(Stage::PostEmbolism).await;

    assert_eq!(explanation, unavailable_explanation(Stage::PostEmbolism));
}

#[tokio::test]
async fn offline_client_never_contacts_the_server() {
    let server = common::start_gemini_mock().await;

    let client = ExplanationClient::new(None).with_base_url(server.uri());
    assert!(!client.is_online());

    let explanation = client.fetch(Stage::Normal).await;
    assert_eq!(explanation, offline_explanation(Stage::Normal));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn blank_api_key_counts_as_offline() {
    let client = ExplanationClient::new(Some(ApiKey::new("   ")));
    assert!(!client.is_online());
}

#[test]
fn fallbacks_cover_every_stage_with_usable_text() {
    for stage in Stage::all() {
        for explanation in [offline_explanation(stage), unavailable_explanation(stage)] {
            assert!(!explanation.title.trim().is_empty(), "{stage}: empty title");
            assert!(
                !explanation.content.trim().is_empty(),
                "{stage}: empty content"
            );
            assert_eq!(explanation.severity, Severity::Info);
        }
    }
}
