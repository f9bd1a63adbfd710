//! Golden fixture integration tests for popkit-errors.
//!
//! Each fixture in `fixtures/` holds an opaque `error` record and the
//! expected parse outcome.

use popkit_errors::{ErrorCategory, ErrorParser, ParsedError};

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn fixture_path(name: &str) -> std::path::PathBuf {
    let mut p = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("fixtures");
    p.push(name);
    p
}

fn load_fixture(name: &str) -> serde_json::Value {
    let content = std::fs::read_to_string(fixture_path(name)).expect("fixture not found");
    serde_json::from_str(&content).expect("invalid fixture JSON")
}

fn parse_fixture(fixture: &serde_json::Value) -> ParsedError {
    ErrorParser::new().parse(&fixture["error"], None)
}

fn assert_fixture(name: &str) -> ParsedError {
    let f = load_fixture(name);
    let parsed = parse_fixture(&f);

    let expected_category: ErrorCategory =
        serde_json::from_value(f["expectedCategory"].clone()).expect("bad expectedCategory");
    assert_eq!(parsed.category, expected_category, "{name}: category");

    if let Some(msg) = f["expectedUserMessage"].as_str() {
        assert_eq!(parsed.user_message, msg, "{name}: user message");
    }
    if let Some(prefix) = f["expectedUserMessagePrefix"].as_str() {
        assert!(
            parsed.user_message.starts_with(prefix),
            "{name}: '{}' does not start with '{prefix}'",
            parsed.user_message
        );
    }
    if let Some(tech) = f["expectedTechnicalMessage"].as_str() {
        assert_eq!(parsed.technical_message, tech, "{name}: technical message");
    }
    assert_eq!(
        parsed.is_user_rejection(),
        f["expectedUserRejection"].as_bool().unwrap(),
        "{name}: is_user_rejection"
    );
    assert_eq!(
        parsed.is_recoverable(),
        f["expectedRecoverable"].as_bool().unwrap(),
        "{name}: is_recoverable"
    );
    assert_eq!(parsed.original_error, f["error"], "{name}: original error preserved");
    parsed
}

// ─── Scenarios ────────────────────────────────────────────────────────────────

#[test]
fn golden_user_denied_metamask() {
    assert_fixture("user-denied-metamask.json");
}

#[test]
fn golden_revert_reason_already_voted() {
    assert_fixture("revert-reason-already-voted.json");
}

#[test]
fn golden_revert_selector_target_not_allowed() {
    assert_fixture("revert-selector-target-not-allowed.json");
}

#[test]
fn golden_gas_estimation_nested_selector() {
    assert_fixture("gas-estimation-nested-selector.json");
}

#[test]
fn golden_insufficient_funds() {
    assert_fixture("insufficient-funds.json");
}

#[test]
fn golden_network_timeout() {
    assert_fixture("network-timeout.json");
}

#[test]
fn golden_reason_string_without_marker_is_unknown() {
    assert_fixture("hardhat-reason-string.json");
}

#[test]
fn golden_nested_data_message() {
    assert_fixture("nested-data-message.json");
}

// ─── Cross-cutting properties ─────────────────────────────────────────────────

#[test]
fn every_fixture_yields_a_user_message() {
    let dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures");
    let mut seen = 0;
    for entry in std::fs::read_dir(dir).expect("fixtures dir") {
        let path = entry.expect("dir entry").path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let content = std::fs::read_to_string(&path).unwrap();
        let f: serde_json::Value = serde_json::from_str(&content).unwrap();
        let parsed = parse_fixture(&f);
        assert!(!parsed.user_message.is_empty(), "{}", path.display());
        assert!(parsed.user_message.chars().count() <= 200);
        seen += 1;
    }
    assert!(seen >= 8);
}

#[test]
fn outer_reason_wins_over_nested_reason() {
    let parsed = ErrorParser::new().parse(
        &serde_json::json!({
            "code": "CALL_EXCEPTION",
            "reason": "Paused",
            "error": { "reason": "NotClaimer" }
        }),
        None,
    );
    assert_eq!(parsed.technical_message, "Paused");
    assert_eq!(parsed.user_message, "This contract is currently paused.");
}

#[test]
fn parsed_error_json_shape() {
    let parsed = ErrorParser::new().from_message("user rejected transaction");
    let v = serde_json::to_value(&parsed).unwrap();
    assert_eq!(v["category"], "USER_REJECTED");
    assert_eq!(v["userMessage"], "Transaction cancelled.");
    assert!(v["timestamp"].as_i64().unwrap() > 0);
    assert!(v.get("reason").is_none());
}
