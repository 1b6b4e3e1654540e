// decisioning-core/src/runtime/engine.rs
// ============================================================================
// Module: Decisioning Engine
// Description: Request dispatch and response ingestion state machine.
// Purpose: Turn inbound events into cache updates and outbound events.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The engine is the single canonical execution path for the decisioning
//! client. It validates application requests, builds outbound query and
//! tracking payloads, ingests personalization responses into the proposition
//! cache, and emits notification and correlated response events. No failure
//! crosses the engine boundary: every error is either a diagnostic record or
//! an explicit error-bearing response event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde_json::Value;

use crate::core::DECISIONS_MARKER;
use crate::core::DecisionScope;
use crate::core::InboundEvent;
use crate::core::InteractionType;
use crate::core::OutboundEvent;
use crate::core::Proposition;
use crate::core::PropositionReference;
use crate::core::REQUEST_TYPE_GET;
use crate::core::REQUEST_TYPE_TRACK;
use crate::core::REQUEST_TYPE_UPDATE;
use crate::core::RequestId;
use crate::core::ResponseError;
use crate::core::build_interaction_track;
use crate::core::build_personalization_query;
use crate::core::scopes_from_request;
use crate::core::valid_scopes;
use crate::interfaces::ConfigSource;
use crate::interfaces::DiagnosticLevel;
use crate::interfaces::DiagnosticRecord;
use crate::interfaces::DiagnosticsSink;
use crate::interfaces::EventSink;
use crate::runtime::cache::PropositionCache;

// ============================================================================
// SECTION: Wire Keys
// ============================================================================

/// JSON key discriminating application request kinds.
const REQUEST_TYPE: &str = "requesttype";
/// JSON key for the structured-data block in request data.
const XDM: &str = "xdm";
/// JSON key for the free-form data block in request data.
const DATA: &str = "data";
/// JSON key for the proposition-interactions block in track requests.
const PROPOSITION_INTERACTIONS: &str = "propositioninteractions";
/// JSON key for the interaction kind inside the interactions block.
const INTERACTION_TYPE: &str = "interactiontype";
/// JSON key for the proposition references inside the interactions block.
const PROPOSITIONS: &str = "propositions";
/// JSON key for the response or error type marker.
const TYPE: &str = "type";
/// JSON key for the proposition units in a decisions response.
const PAYLOAD: &str = "payload";
/// JSON key for the error detail message.
const DETAIL: &str = "detail";
/// JSON key for the error status code.
const STATUS: &str = "status";

// ============================================================================
// SECTION: Diagnostic Areas
// ============================================================================

/// Diagnostic area for update-request handling.
const AREA_UPDATE: &str = "update";
/// Diagnostic area for get-request handling.
const AREA_GET: &str = "get";
/// Diagnostic area for track-request handling.
const AREA_TRACK: &str = "track";
/// Diagnostic area for clear-request handling.
const AREA_CLEAR: &str = "clear";
/// Diagnostic area for decisions-response ingestion.
const AREA_DECISIONS: &str = "decisions";
/// Diagnostic area for upstream error responses.
const AREA_SERVICE_ERROR: &str = "service_error";
/// Diagnostic area for request classification.
const AREA_REQUEST: &str = "request";

// ============================================================================
// SECTION: Decisioning Engine
// ============================================================================

/// Decisioning engine owning the proposition cache and its collaborators.
///
/// # Invariants
/// - The engine is driven by a single serial worker; the cache is the only
///   shared mutable state and every mutation goes through its scoped
///   operations.
pub struct DecisioningEngine<S, C, D> {
    /// Proposition cache keyed by decision scope.
    cache: PropositionCache,
    /// Outbound event sink.
    sink: S,
    /// Shared-configuration source.
    config: C,
    /// Diagnostics sink.
    diagnostics: D,
}

impl<S, C, D> DecisioningEngine<S, C, D>
where
    S: EventSink,
    C: ConfigSource,
    D: DiagnosticsSink,
{
    /// Creates a new engine over the provided cache and collaborators.
    #[must_use]
    pub const fn new(cache: PropositionCache, sink: S, config: C, diagnostics: D) -> Self {
        Self {
            cache,
            sink,
            config,
            diagnostics,
        }
    }

    /// Returns a handle to the proposition cache.
    #[must_use]
    pub const fn cache(&self) -> &PropositionCache {
        &self.cache
    }

    /// Processes one inbound event.
    ///
    /// Never fails outward: parse failures, missing configuration, and
    /// delivery errors degrade to diagnostics or explicit error responses.
    pub fn handle(&self, event: InboundEvent) {
        match event {
            InboundEvent::Request {
                request_id,
                data,
            } => self.handle_request(request_id, &data),
            InboundEvent::ClearRequest | InboundEvent::IdentityReset => self.handle_clear(),
            InboundEvent::ServiceResponse {
                data,
            } => self.handle_decisions(&data),
            InboundEvent::ServiceError {
                data,
            } => self.handle_service_error(&data),
        }
    }

    /// Routes an application request by its request-type discriminator.
    fn handle_request(&self, request_id: RequestId, data: &Value) {
        match data.get(REQUEST_TYPE).and_then(Value::as_str) {
            Some(REQUEST_TYPE_UPDATE) => self.handle_update(data),
            Some(REQUEST_TYPE_GET) => self.handle_get(request_id, data),
            Some(REQUEST_TYPE_TRACK) => self.handle_track(data),
            other => {
                let label = other.unwrap_or("missing");
                self.diag(
                    DiagnosticLevel::Debug,
                    AREA_REQUEST,
                    format!("request dropped: unrecognized request type ({label})"),
                );
            }
        }
    }

    /// Handles an update-propositions request.
    ///
    /// Fire and forget: zero valid scopes or missing configuration abandon
    /// the request with a diagnostic and no outbound event.
    fn handle_update(&self, data: &Value) {
        let scopes = scopes_from_request(data);
        let valid = valid_scopes(&scopes);
        if valid.is_empty() {
            self.diag(
                DiagnosticLevel::Debug,
                AREA_UPDATE,
                "update request dropped: no valid decision scope".to_string(),
            );
            return;
        }
        let Some(config) = self.config.snapshot() else {
            self.diag(
                DiagnosticLevel::Debug,
                AREA_UPDATE,
                "update request dropped: configuration is not available".to_string(),
            );
            return;
        };
        let payload = build_personalization_query(
            &valid,
            data.get(XDM).and_then(Value::as_object),
            data.get(DATA).and_then(Value::as_object),
            config.dataset_override(),
        );
        self.dispatch(
            OutboundEvent::PersonalizationQuery {
                payload,
            },
            AREA_UPDATE,
        );
    }

    /// Handles a get-propositions request.
    ///
    /// A caller is waiting on the correlated response, so every failure path
    /// dispatches an explicit error response instead of going silent.
    fn handle_get(&self, request_id: RequestId, data: &Value) {
        let scopes = scopes_from_request(data);
        let valid = valid_scopes(&scopes);
        if valid.is_empty() {
            self.diag(
                DiagnosticLevel::Debug,
                AREA_GET,
                "get request failed: no valid decision scope".to_string(),
            );
            self.respond(request_id, Err(ResponseError::InvalidRequest));
            return;
        }
        if self.config.snapshot().is_none() {
            self.diag(
                DiagnosticLevel::Debug,
                AREA_GET,
                "get request failed: configuration is not available".to_string(),
            );
            self.respond(request_id, Err(ResponseError::ConfigurationMissing));
            return;
        }
        match self.cache.lookup(&valid) {
            Ok(propositions) => self.respond(request_id, Ok(propositions)),
            Err(err) => {
                self.diag(
                    DiagnosticLevel::Warning,
                    AREA_GET,
                    format!("get request failed: {err}"),
                );
                self.respond(request_id, Err(ResponseError::Unexpected));
            }
        }
    }

    /// Handles a track-propositions request.
    ///
    /// Fire and forget: an empty or malformed interactions block abandons
    /// the request with a diagnostic and no outbound event.
    fn handle_track(&self, data: &Value) {
        let Some(interactions) =
            data.get(PROPOSITION_INTERACTIONS).and_then(Value::as_object).filter(|i| !i.is_empty())
        else {
            self.diag(
                DiagnosticLevel::Debug,
                AREA_TRACK,
                "track request dropped: interactions data is missing or empty".to_string(),
            );
            return;
        };
        let Some(interaction) = interactions
            .get(INTERACTION_TYPE)
            .and_then(Value::as_str)
            .and_then(InteractionType::from_name)
        else {
            self.diag(
                DiagnosticLevel::Debug,
                AREA_TRACK,
                "track request dropped: unrecognized interaction type".to_string(),
            );
            return;
        };
        let references: Vec<PropositionReference> = interactions
            .get(PROPOSITIONS)
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(PropositionReference::from_payload).collect())
            .unwrap_or_default();
        if references.is_empty() {
            self.diag(
                DiagnosticLevel::Debug,
                AREA_TRACK,
                "track request dropped: no valid proposition reference".to_string(),
            );
            return;
        }
        let Some(config) = self.config.snapshot() else {
            self.diag(
                DiagnosticLevel::Warning,
                AREA_TRACK,
                "track request dropped: configuration is not available".to_string(),
            );
            return;
        };
        if let Some(payload) =
            build_interaction_track(interaction, &references, config.dataset_override())
        {
            self.dispatch(
                OutboundEvent::InteractionTrack {
                    payload,
                },
                AREA_TRACK,
            );
        }
    }

    /// Handles a clear-propositions or identities-reset request.
    fn handle_clear(&self) {
        if let Err(err) = self.cache.clear() {
            self.diag(
                DiagnosticLevel::Warning,
                AREA_CLEAR,
                format!("clear request failed: {err}"),
            );
        }
    }

    /// Ingests a personalization-decisions response.
    ///
    /// Events without the decisions marker are ignored with a debug trace.
    /// Parsed propositions are merged into the cache atomically and the
    /// newly-ingested set is broadcast as a notification.
    fn handle_decisions(&self, data: &Value) {
        if data.get(TYPE).and_then(Value::as_str) != Some(DECISIONS_MARKER) {
            self.diag(
                DiagnosticLevel::Debug,
                AREA_DECISIONS,
                "response ignored: not a personalization decisions event".to_string(),
            );
            return;
        }
        let Some(units) = data.get(PAYLOAD).and_then(Value::as_array) else {
            self.diag(
                DiagnosticLevel::Debug,
                AREA_DECISIONS,
                "response ignored: payload is missing or not a list".to_string(),
            );
            return;
        };
        let mut batch: BTreeMap<DecisionScope, Proposition> = BTreeMap::new();
        for unit in units {
            let item_count = Proposition::payload_item_count(unit);
            match Proposition::from_payload(unit) {
                Some(proposition) => {
                    let kept = proposition.offers.len() + proposition.tracking_items.len();
                    if kept < item_count {
                        self.diag(
                            DiagnosticLevel::Debug,
                            AREA_DECISIONS,
                            format!("{} malformed item(s) dropped from response unit", item_count - kept),
                        );
                    }
                    batch.insert(DecisionScope::new(proposition.scope.clone()), proposition);
                }
                None => self.diag(
                    DiagnosticLevel::Debug,
                    AREA_DECISIONS,
                    "response unit dropped: no proposition with valid offers".to_string(),
                ),
            }
        }
        if batch.is_empty() {
            self.diag(
                DiagnosticLevel::Debug,
                AREA_DECISIONS,
                "response ignored: no propositions with valid offers are present".to_string(),
            );
            return;
        }
        if let Err(err) = self.cache.merge(batch.clone()) {
            self.diag(
                DiagnosticLevel::Warning,
                AREA_DECISIONS,
                format!("response ingestion failed: {err}"),
            );
            return;
        }
        self.dispatch(
            OutboundEvent::Notification {
                propositions: batch.into_values().collect(),
            },
            AREA_DECISIONS,
        );
    }

    /// Logs an upstream service error response.
    ///
    /// Error responses never mutate the cache and never surface to the
    /// application caller synchronously.
    fn handle_service_error(&self, data: &Value) {
        let error_type = data.get(TYPE).and_then(Value::as_str).unwrap_or_default();
        let detail = data.get(DETAIL).and_then(Value::as_str).unwrap_or_default();
        let status = data
            .get(STATUS)
            .and_then(Value::as_u64)
            .map_or_else(|| "-".to_string(), |code| code.to_string());
        self.diag(
            DiagnosticLevel::Warning,
            AREA_SERVICE_ERROR,
            format!(
                "decisioning service error: type ({error_type}), detail ({detail}), status ({status})"
            ),
        );
    }

    /// Dispatches a correlated response event.
    fn respond(&self, request_id: RequestId, result: Result<Vec<Proposition>, ResponseError>) {
        self.dispatch(
            OutboundEvent::Response {
                request_id,
                result,
            },
            AREA_GET,
        );
    }

    /// Dispatches an outbound event, degrading failures to diagnostics.
    fn dispatch(&self, event: OutboundEvent, area: &'static str) {
        let kind = event.kind();
        if let Err(err) = self.sink.dispatch(event) {
            self.diag(
                DiagnosticLevel::Warning,
                area,
                format!("failed to dispatch {kind} event: {err}"),
            );
        }
    }

    /// Records one diagnostic.
    fn diag(&self, level: DiagnosticLevel, area: &'static str, message: String) {
        self.diagnostics.record(DiagnosticRecord {
            level,
            area,
            message,
        });
    }
}
