// decisioning-core/tests/requests.rs
// ============================================================================
// Module: Request Builder Tests
// Description: Tests for outbound query and tracking payload assembly.
// Purpose: Ensure builders honor scope validation and optional blocks.
// Dependencies: decisioning-core, serde_json
// ============================================================================
//! ## Overview
//! Exercises the personalization query and interaction-track builders,
//! including optional data blocks and the dataset-override field.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use decisioning_core::DecisionScope;
use decisioning_core::InteractionType;
use decisioning_core::PropositionReference;
use decisioning_core::build_interaction_track;
use decisioning_core::build_personalization_query;
use decisioning_core::scopes_from_request;
use decisioning_core::valid_scopes;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

/// Verifies scope extraction accepts object and string entries.
#[test]
fn scopes_from_request_accepts_both_entry_shapes() {
    let data = json!({
        "decisionscopes": [ { "name": "scope-a" }, "scope-b", 7 ]
    });

    let scopes = scopes_from_request(&data);
    assert_eq!(scopes, vec![DecisionScope::new("scope-a"), DecisionScope::new("scope-b")]);
}

/// Verifies invalid scopes are filtered while order is preserved.
#[test]
fn valid_scopes_filters_and_preserves_order() {
    let scopes =
        vec![DecisionScope::new("scope-a"), DecisionScope::new(""), DecisionScope::new("scope-b")];

    let valid = valid_scopes(&scopes);
    assert_eq!(valid, vec![DecisionScope::new("scope-a"), DecisionScope::new("scope-b")]);
}

/// Verifies the query payload lists scope names and the fixed event type.
#[test]
fn query_lists_scopes_and_event_type() {
    let scopes = vec![DecisionScope::new("scope-a"), DecisionScope::new("scope-b")];

    let payload = build_personalization_query(&scopes, None, None, None);
    assert_eq!(
        payload.pointer("/query/personalization/decisionScopes"),
        Some(&json!(["scope-a", "scope-b"]))
    );
    assert_eq!(
        payload.pointer("/xdm/eventType").and_then(Value::as_str),
        Some("personalization.request")
    );
    assert_eq!(payload.get("data"), None);
    assert_eq!(payload.get("datasetId"), None);
}

/// Verifies caller-supplied structured data merges under the event type.
#[test]
fn query_merges_caller_xdm_fields() {
    let scopes = vec![DecisionScope::new("scope-a")];
    let mut xdm = Map::new();
    xdm.insert("myXdmKey".to_string(), json!("myXdmValue"));

    let payload = build_personalization_query(&scopes, Some(&xdm), None, None);
    assert_eq!(payload.pointer("/xdm/myXdmKey").and_then(Value::as_str), Some("myXdmValue"));
    assert_eq!(
        payload.pointer("/xdm/eventType").and_then(Value::as_str),
        Some("personalization.request")
    );
}

/// Verifies the free-form data block is emitted only when non-empty.
#[test]
fn query_emits_data_block_only_when_non_empty() {
    let scopes = vec![DecisionScope::new("scope-a")];

    let empty = Map::new();
    let payload = build_personalization_query(&scopes, None, Some(&empty), None);
    assert_eq!(payload.get("data"), None);

    let mut data = Map::new();
    data.insert("myKey".to_string(), json!("myValue"));
    let payload = build_personalization_query(&scopes, None, Some(&data), None);
    assert_eq!(payload.pointer("/data/myKey").and_then(Value::as_str), Some("myValue"));
}

/// Verifies the dataset-override field is emitted only when configured.
#[test]
fn query_emits_dataset_id_only_when_configured() {
    let scopes = vec![DecisionScope::new("scope-a")];

    let payload = build_personalization_query(&scopes, None, None, Some("dataset-111"));
    assert_eq!(payload.get("datasetId").and_then(Value::as_str), Some("dataset-111"));

    let payload = build_personalization_query(&scopes, None, None, Some(""));
    assert_eq!(payload.get("datasetId"), None);
}

/// Verifies the track payload nests interaction and references.
#[test]
fn track_nests_interaction_and_references() {
    let reference = PropositionReference {
        id: "proposition-1".to_string(),
        scope: "myMboxScope".to_string(),
        scope_details: Map::new(),
        item_ids: vec!["offer-1".to_string()],
    };

    let payload =
        build_interaction_track(InteractionType::Display, &[reference], Some("dataset-111"))
            .expect("track payload");
    assert_eq!(
        payload.pointer("/xdm/eventType").and_then(Value::as_str),
        Some("decisioning.propositionDisplay")
    );
    assert_eq!(
        payload
            .pointer("/xdm/_experience/decisioning/propositions/0/id")
            .and_then(Value::as_str),
        Some("proposition-1")
    );
    assert_eq!(
        payload
            .pointer("/xdm/_experience/decisioning/propositions/0/items/0/id")
            .and_then(Value::as_str),
        Some("offer-1")
    );
    assert_eq!(payload.get("datasetId").and_then(Value::as_str), Some("dataset-111"));
}

/// Verifies the interact kind maps to its experience-event type.
#[test]
fn track_uses_interact_event_type() {
    let reference = PropositionReference {
        id: "proposition-1".to_string(),
        scope: "myMboxScope".to_string(),
        scope_details: Map::new(),
        item_ids: Vec::new(),
    };

    let payload = build_interaction_track(InteractionType::Interact, &[reference], None)
        .expect("track payload");
    assert_eq!(
        payload.pointer("/xdm/eventType").and_then(Value::as_str),
        Some("decisioning.propositionInteract")
    );
    assert_eq!(payload.get("datasetId"), None);
}

/// Verifies an empty reference list builds no track payload.
#[test]
fn track_with_no_references_builds_nothing() {
    assert_eq!(build_interaction_track(InteractionType::Display, &[], None), None);
}
