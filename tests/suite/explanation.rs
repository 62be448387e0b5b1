//! Explanation and severity type tests

use venosim_types::{ApiKey, Explanation, ExplanationError, Severity, Stage};

#[test]
fn severity_orders_by_urgency() {
    assert!(Severity::Info < Severity::Warning);
    assert!(Severity::Warning < Severity::Critical);
}

#[test]
fn explanation_deserializes_the_wire_shape() {
    let json = r#"{
        "title": "Pulmonary Embolism",
        "content": "The embolus has lodged in the pulmonary circulation.",
        "warningLevel": "critical"
    }"#;

    let explanation: Explanation = serde_json::from_str(json).unwrap();
    assert_eq!(explanation.title, "Pulmonary Embolism");
    assert_eq!(explanation.severity, Severity::Critical);
}

#[test]
fn explanation_rejects_blank_fields() {
    assert_eq!(
        Explanation::try_new("  ", "content", Severity::Info),
        Err(ExplanationError::EmptyTitle)
    );
    assert_eq!(
        Explanation::try_new("title", "", Severity::Info),
        Err(ExplanationError::EmptyContent)
    );
}

#[test]
fn unknown_severity_fails_to_deserialize() {
    let json = r#"{"title": "t", "content": "c", "warningLevel": "catastrophic"}"#;
    assert!(serde_json::from_str::<Explanation>(json).is_err());
}

#[test]
fn api_key_debug_is_redacted() {
    let key = ApiKey::new("AIzaSy-very-secret");
    let debug = format!("{key:?}");
    assert!(!debug.contains("secret"));
    assert!(debug.contains("***"));
}

#[test]
fn stage_labels_are_distinct() {
    let labels: Vec<&str> = Stage::all().iter().map(|s| s.label()).collect();
    let mut deduped = labels.clone();
    deduped.sort_unstable();
    deduped.dedup();
    assert_eq!(labels.len(), deduped.len());
}
