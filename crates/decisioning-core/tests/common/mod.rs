// decisioning-core/tests/common/mod.rs
// ============================================================================
// Module: Core Test Helpers
// Description: Shared recording doubles and payload fixtures for core tests.
// Purpose: Capture outbound events and diagnostics emitted by the engine.
// Dependencies: decisioning-core, serde_json
// ============================================================================

//! ## Overview
//! Recording implementations of the engine interfaces plus fixture builders
//! for response payloads used across the core test suites.

#![allow(
    dead_code,
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only helpers are shared across suites that use different subsets."
)]

use std::sync::Arc;
use std::sync::Mutex;

use decisioning_core::ConfigSnapshot;
use decisioning_core::DATASET_OVERRIDE_KEY;
use decisioning_core::DiagnosticRecord;
use decisioning_core::DiagnosticsSink;
use decisioning_core::DispatchError;
use decisioning_core::EventSink;
use decisioning_core::OutboundEvent;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

/// Event sink recording every dispatched outbound event.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    /// Captured events in dispatch order.
    events: Arc<Mutex<Vec<OutboundEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the captured events.
    pub fn events(&self) -> Vec<OutboundEvent> {
        self.events.lock().map(|guard| guard.clone()).unwrap_or_default()
    }
}

impl EventSink for RecordingSink {
    fn dispatch(&self, event: OutboundEvent) -> Result<(), DispatchError> {
        self.events
            .lock()
            .map_err(|_| DispatchError::DispatchFailed("recording sink poisoned".to_string()))?
            .push(event);
        Ok(())
    }
}

/// Diagnostics sink recording every diagnostic.
#[derive(Debug, Default, Clone)]
pub struct RecordingDiagnostics {
    /// Captured records in emission order.
    records: Arc<Mutex<Vec<DiagnosticRecord>>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the captured records.
    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.records.lock().map(|guard| guard.clone()).unwrap_or_default()
    }
}

impl DiagnosticsSink for RecordingDiagnostics {
    fn record(&self, record: DiagnosticRecord) {
        if let Ok(mut guard) = self.records.lock() {
            guard.push(record);
        }
    }
}

/// Builds a configuration snapshot carrying a dataset override.
pub fn config_with_dataset(dataset_id: &str) -> ConfigSnapshot {
    let mut values = Map::new();
    values.insert(DATASET_OVERRIDE_KEY.to_string(), json!(dataset_id));
    ConfigSnapshot::new(values)
}

/// Builds a valid HTML response item payload.
pub fn html_item(id: &str, content: &str) -> Value {
    json!({
        "id": id,
        "etag": "8",
        "schema": "https://ns.adobe.com/experience/offer-management/content-component-html",
        "data": {
            "id": id,
            "format": "text/html",
            "content": content,
            "language": ["en-us"],
            "characteristics": { "mobile": "true" }
        }
    })
}

/// Builds a decisions response carrying one proposition per (scope, item).
pub fn decisions_response(units: Vec<Value>) -> Value {
    json!({
        "type": "personalization:decisions",
        "payload": units
    })
}

/// Builds one proposition unit payload for a scope with the given items.
pub fn proposition_unit(id: &str, scope: &str, items: Vec<Value>) -> Value {
    json!({
        "id": id,
        "scope": scope,
        "scopeDetails": {
            "decisionProvider": "TGT",
            "activity": { "id": "125589" }
        },
        "items": items
    })
}
