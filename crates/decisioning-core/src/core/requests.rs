// decisioning-core/src/core/requests.rs
// ============================================================================
// Module: Request Builders
// Description: Outbound query and tracking payload assembly.
// Purpose: Build personalization query and interaction payloads from scopes.
// Dependencies: crate::core, serde_json
// ============================================================================

//! ## Overview
//! Request builders assemble the outbound payloads dispatched to the
//! personalization service. They are pure functions over validated inputs:
//! scope validation happens before a builder runs, and a builder never
//! performs I/O or consults shared state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::core::events::InteractionType;
use crate::core::proposition::PropositionReference;
use crate::core::scope::DecisionScope;

// ============================================================================
// SECTION: Wire Keys
// ============================================================================

/// JSON key for the decision-scope list in request data.
const DECISION_SCOPES: &str = "decisionscopes";
/// JSON key for a scope name inside a request scope entry.
const DECISION_SCOPE_NAME: &str = "name";
/// JSON key for the structured-data block.
const XDM: &str = "xdm";
/// JSON key for the free-form data block.
const DATA: &str = "data";
/// JSON key for the query block.
const QUERY: &str = "query";
/// JSON key for the personalization query sub-block.
const QUERY_PERSONALIZATION: &str = "personalization";
/// JSON key for the scope names inside the personalization query.
const QUERY_DECISION_SCOPES: &str = "decisionScopes";
/// JSON key for the experience-event type.
const EXPERIENCE_EVENT_TYPE: &str = "eventType";
/// JSON key for the dataset-override field.
const DATASET_ID: &str = "datasetId";
/// JSON key for the experience namespace in tracking payloads.
const EXPERIENCE: &str = "_experience";
/// JSON key for the decisioning block in tracking payloads.
const DECISIONING: &str = "decisioning";
/// JSON key for the proposition references in tracking payloads.
const PROPOSITIONS: &str = "propositions";

/// Experience-event type marker for personalization queries.
const EVENT_TYPE_PERSONALIZATION: &str = "personalization.request";

// ============================================================================
// SECTION: Scope Extraction
// ============================================================================

/// Reads the decision-scope list from request data.
///
/// Scope entries may be objects carrying a `name` field or plain strings.
/// Entries of any other shape are skipped.
#[must_use]
pub fn scopes_from_request(data: &Value) -> Vec<DecisionScope> {
    data.get(DECISION_SCOPES)
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| match entry {
                    Value::String(name) => Some(DecisionScope::new(name.clone())),
                    Value::Object(fields) => fields
                        .get(DECISION_SCOPE_NAME)
                        .and_then(Value::as_str)
                        .map(DecisionScope::new),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Filters a scope list down to the valid scopes, preserving order.
#[must_use]
pub fn valid_scopes(scopes: &[DecisionScope]) -> Vec<DecisionScope> {
    scopes.iter().filter(|scope| scope.is_valid()).cloned().collect()
}

// ============================================================================
// SECTION: Query Builder
// ============================================================================

/// Builds the outbound personalization query payload.
///
/// The query block lists the valid scope names; the structured-data block
/// merges caller-supplied fields with the fixed personalization event type;
/// the free-form data block is emitted only when non-empty; the
/// dataset-override field is emitted only when configured.
#[must_use]
pub fn build_personalization_query(
    scopes: &[DecisionScope],
    xdm: Option<&Map<String, Value>>,
    data: Option<&Map<String, Value>>,
    dataset_id: Option<&str>,
) -> Value {
    let scope_names: Vec<&str> = scopes.iter().map(DecisionScope::name).collect();
    let mut payload = Map::new();
    payload.insert(
        QUERY.to_string(),
        json!({ (QUERY_PERSONALIZATION): { (QUERY_DECISION_SCOPES): scope_names } }),
    );

    let mut merged_xdm = xdm.cloned().unwrap_or_default();
    merged_xdm.insert(EXPERIENCE_EVENT_TYPE.to_string(), json!(EVENT_TYPE_PERSONALIZATION));
    payload.insert(XDM.to_string(), Value::Object(merged_xdm));

    if let Some(fields) = data
        && !fields.is_empty()
    {
        payload.insert(DATA.to_string(), Value::Object(fields.clone()));
    }

    if let Some(dataset_id) = dataset_id
        && !dataset_id.is_empty()
    {
        payload.insert(DATASET_ID.to_string(), json!(dataset_id));
    }

    Value::Object(payload)
}

// ============================================================================
// SECTION: Track Builder
// ============================================================================

/// Builds the outbound interaction-tracking payload.
///
/// Returns `None` when no proposition references are supplied; a tracking
/// request without references carries nothing to report and must not
/// dispatch an event.
#[must_use]
pub fn build_interaction_track(
    interaction: InteractionType,
    references: &[PropositionReference],
    dataset_id: Option<&str>,
) -> Option<Value> {
    if references.is_empty() {
        return None;
    }
    let entries: Vec<Value> = references.iter().map(PropositionReference::to_payload).collect();
    let mut payload = Map::new();
    payload.insert(
        XDM.to_string(),
        json!({
            (EXPERIENCE_EVENT_TYPE): interaction.as_event_type(),
            (EXPERIENCE): { (DECISIONING): { (PROPOSITIONS): entries } },
        }),
    );
    if let Some(dataset_id) = dataset_id
        && !dataset_id.is_empty()
    {
        payload.insert(DATASET_ID.to_string(), json!(dataset_id));
    }
    Some(Value::Object(payload))
}
