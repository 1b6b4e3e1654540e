// decisioning-broker/src/source/replay.rs
// ============================================================================
// Module: Decisioning Replay Source
// Description: Recorded-event source for demos and tests.
// Purpose: Decode a JSON event log and feed it into a serial worker.
// Dependencies: decisioning-core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! `ReplaySource` decodes a JSON array of recorded inbound events and submits
//! them to a [`SerialWorker`] in order. Record kinds: `request` (with a
//! `requestId` and `data`), `response`, `error`, `clear`, and
//! `identity-reset`.
//! Invariants:
//! - Decoding fails closed: an unrecognized record kind is an error, not a
//!   silent skip.
//! - Submission preserves record order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use decisioning_core::InboundEvent;
use decisioning_core::RequestId;
use decisioning_core::SerialWorker;
use decisioning_core::WorkerError;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Record Keys
// ============================================================================

/// JSON key for the record kind discriminator.
const KIND: &str = "kind";
/// JSON key for the request correlation identifier.
const REQUEST_ID: &str = "requestId";
/// JSON key for the record data payload.
const DATA: &str = "data";

/// Record kind for application requests.
const KIND_REQUEST: &str = "request";
/// Record kind for service responses.
const KIND_RESPONSE: &str = "response";
/// Record kind for service error responses.
const KIND_ERROR: &str = "error";
/// Record kind for clear-propositions requests.
const KIND_CLEAR: &str = "clear";
/// Record kind for identities-reset signals.
const KIND_IDENTITY_RESET: &str = "identity-reset";

// ============================================================================
// SECTION: Replay Errors
// ============================================================================

/// Errors emitted by the replay source.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Event log could not be decoded.
    #[error("replay decode failed: {0}")]
    Decode(String),
    /// Worker rejected a submission.
    #[error("replay submit failed: {0}")]
    Submit(#[from] WorkerError),
}

// ============================================================================
// SECTION: Replay Source
// ============================================================================

/// Recorded inbound events replayed into a serial worker.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    /// Decoded events in record order.
    events: Vec<InboundEvent>,
}

impl ReplaySource {
    /// Creates a replay source from already-built events.
    #[must_use]
    pub const fn new(events: Vec<InboundEvent>) -> Self {
        Self {
            events,
        }
    }

    /// Decodes a replay source from a JSON event log.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Decode`] when the log is not a JSON array or a
    /// record is malformed.
    pub fn from_json(text: &str) -> Result<Self, ReplayError> {
        let value: Value =
            serde_json::from_str(text).map_err(|err| ReplayError::Decode(err.to_string()))?;
        let records = value
            .as_array()
            .ok_or_else(|| ReplayError::Decode("event log is not an array".to_string()))?;
        let events =
            records.iter().map(decode_record).collect::<Result<Vec<InboundEvent>, ReplayError>>()?;
        Ok(Self {
            events,
        })
    }

    /// Returns the decoded events.
    #[must_use]
    pub fn events(&self) -> &[InboundEvent] {
        &self.events
    }

    /// Submits every event to the worker in record order.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Submit`] when the worker queue is closed.
    pub fn drain_into(&self, worker: &SerialWorker) -> Result<usize, ReplayError> {
        for event in &self.events {
            worker.submit(event.clone())?;
        }
        Ok(self.events.len())
    }
}

/// Decodes one event-log record.
fn decode_record(record: &Value) -> Result<InboundEvent, ReplayError> {
    let kind = record
        .get(KIND)
        .and_then(Value::as_str)
        .ok_or_else(|| ReplayError::Decode("record has no kind".to_string()))?;
    match kind {
        KIND_REQUEST => {
            let request_id = record
                .get(REQUEST_ID)
                .and_then(Value::as_str)
                .ok_or_else(|| ReplayError::Decode("request record has no requestId".to_string()))?;
            Ok(InboundEvent::Request {
                request_id: RequestId::new(request_id),
                data: record.get(DATA).cloned().unwrap_or(Value::Null),
            })
        }
        KIND_RESPONSE => Ok(InboundEvent::ServiceResponse {
            data: record.get(DATA).cloned().unwrap_or(Value::Null),
        }),
        KIND_ERROR => Ok(InboundEvent::ServiceError {
            data: record.get(DATA).cloned().unwrap_or(Value::Null),
        }),
        KIND_CLEAR => Ok(InboundEvent::ClearRequest),
        KIND_IDENTITY_RESET => Ok(InboundEvent::IdentityReset),
        other => Err(ReplayError::Decode(format!("unrecognized record kind: {other}"))),
    }
}
