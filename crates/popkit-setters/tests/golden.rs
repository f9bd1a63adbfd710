//! Golden fixture integration tests for popkit-setters.
//!
//! Each fixture names a template, the form values and preview lookup, and the
//! expected call and preview sentence. Arguments are compared by their
//! display form (`0x`-hex for bytes).

use popkit_setters::{
    ContractKey, DangerLevel, IssueKind, PreviewLookup, RawFunctionCatalog, SetterError, SetterRegistry,
};
use serde_json::json;

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

fn assert_fixture(name: &str) {
    let f = load_fixture(name);
    let registry = SetterRegistry::new();
    let id = f["template"].as_str().unwrap();
    let template = registry.template(id).unwrap_or_else(|| panic!("{name}: unknown template {id}"));

    assert!(registry.validate(template, &f["values"]).is_empty(), "{name}: values should validate");
    let call = registry.encode(template, &f["values"]).unwrap();

    let expected_contract: ContractKey = serde_json::from_value(f["expectedContract"].clone()).unwrap();
    assert_eq!(call.contract, expected_contract, "{name}: contract");
    assert_eq!(call.function_name, f["expectedFunction"].as_str().unwrap(), "{name}: function");

    let args: Vec<String> = call.args.iter().map(|a| a.to_string()).collect();
    let expected_args: Vec<String> = serde_json::from_value(f["expectedArgs"].clone()).unwrap();
    assert_eq!(args, expected_args, "{name}: args");

    if let Some(level) = f["expectedDangerLevel"].as_str() {
        let expected: DangerLevel = serde_json::from_value(json!(level)).unwrap();
        assert_eq!(call.danger_level, Some(expected), "{name}: danger level");
        assert!(call.warning.is_some(), "{name}: critical templates carry a warning");
    }

    let lookup: PreviewLookup = serde_json::from_value(f["lookup"].clone()).unwrap();
    assert_eq!(
        registry.preview(template, &f["values"], &lookup),
        f["expectedPreview"].as_str().unwrap(),
        "{name}: preview"
    );

    // Positional args line up with the raw function's parameters.
    let function = RawFunctionCatalog::with_defaults()
        .find(call.contract, &call.function_name)
        .cloned()
        .unwrap_or_else(|| panic!("{name}: no raw function"));
    assert_eq!(function.params.len(), call.args.len(), "{name}: arity");
}

// ─── Scenarios ────────────────────────────────────────────────────────────────

#[test]
fn golden_quorum_hybrid_51() {
    assert_fixture("quorum-hybrid-51.json");
}

#[test]
fn golden_project_permissions_create_review() {
    assert_fixture("project-permissions-create-review.json");
}

#[test]
fn golden_project_permissions_empty() {
    assert_fixture("project-permissions-empty.json");
}

#[test]
fn golden_proposal_creator_hybrid_revoke() {
    assert_fixture("proposal-creator-hybrid-revoke.json");
}

#[test]
fn golden_pause_hybrid() {
    assert_fixture("pause-hybrid.json");
}

#[test]
fn golden_task_creator_grant() {
    assert_fixture("task-creator-grant.json");
}

// ─── Boundaries ───────────────────────────────────────────────────────────────

#[test]
fn quorum_bounds() {
    let registry = SetterRegistry::new();
    for id in ["change-quorum-hybrid", "change-quorum-dd"] {
        let template = registry.template(id).unwrap();
        for ok in [1, 100] {
            assert!(registry.validate(template, &json!({ "quorum": ok })).is_empty(), "{id} {ok}");
        }
        for bad in [0, 101] {
            let issues = registry.validate(template, &json!({ "quorum": bad }));
            assert_eq!(issues.len(), 1, "{id} {bad}");
            assert_eq!(issues[0].kind, IssueKind::OutOfRange);
            assert_eq!(issues[0].input_name, "quorum");
        }
        let issues = registry.validate(template, &json!({ "quorum": "51" }));
        assert_eq!(issues[0].kind, IssueKind::NotInteger);
    }
}

#[test]
fn unknown_template_is_usage_error() {
    let registry = SetterRegistry::new();
    assert!(registry.template("change-everything").is_none());
    let err = registry.encode_by_id("change-everything", &json!({})).unwrap_err();
    assert!(matches!(err, SetterError::InvalidTemplateUsage { .. }));
}

#[test]
fn encode_is_deterministic() {
    let registry = SetterRegistry::new();
    let values = json!({ "role": "42", "hatType": "1", "action": "Grant" });
    let a = registry.encode_by_id("set-dd-hat-allowed", &values).unwrap();
    let b = registry.encode_by_id("set-dd-hat-allowed", &values).unwrap();
    assert_eq!(a, b);
}

#[test]
fn preview_without_lookup_uses_raw_ids() {
    let registry = SetterRegistry::new();
    let empty = PreviewLookup::new();
    let text = registry
        .preview_by_id(
            "set-project-permissions",
            &json!({ "project": "P9", "role": "R9", "permissions": [8] }),
            &empty,
        )
        .unwrap();
    assert_eq!(text, "Set \"R9\" permissions for P9: ASSIGN");

    for template in registry.templates(None) {
        let text = registry.preview(template, &json!({}), &empty);
        assert!(!text.is_empty(), "{}", template.id);
    }
}

#[test]
fn encoded_call_json_shape() {
    let registry = SetterRegistry::new();
    let call = registry.encode_by_id("unpause-dd", &json!({})).unwrap();
    let v = serde_json::to_value(&call).unwrap();
    assert_eq!(v["templateId"], "unpause-dd");
    assert_eq!(v["contract"], "directDemocracyVoting");
    assert_eq!(v["functionName"], "unpause");
    assert_eq!(v["dangerLevel"], "critical");
    assert_eq!(v["args"], json!([]));
}

#[test]
fn every_template_call_matches_raw_arity() {
    let registry = SetterRegistry::new();
    let catalog = RawFunctionCatalog::with_defaults();
    // Keys a template does not declare are ignored.
    let values = json!({
        "quorum": 51,
        "role": "7",
        "hatType": "0",
        "action": "Grant",
        "project": "P1",
        "permissions": [1, 4],
    });

    let templates = registry.templates(None);
    assert_eq!(templates.len(), 11);
    for template in templates {
        assert!(registry.validate(template, &values).is_empty(), "{}: values should validate", template.id);
        let call = registry.encode(template, &values).unwrap();
        let function = catalog
            .find(call.contract, &call.function_name)
            .unwrap_or_else(|| panic!("{}: no raw function", template.id));
        assert_eq!(function.params.len(), call.args.len(), "{}: arity", template.id);
    }
}
