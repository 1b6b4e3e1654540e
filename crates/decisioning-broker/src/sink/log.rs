// decisioning-broker/src/sink/log.rs
// ============================================================================
// Module: Decisioning Log Sink
// Description: Log-only sink recording outbound events as JSON lines.
// Purpose: Persist outbound event records without delivering payloads.
// Dependencies: decisioning-core, serde_json, std
// ============================================================================

//! ## Overview
//! `LogSink` writes one JSON line per outbound event and delivers nothing to
//! external systems. Useful for demos and for auditing dispatch behavior.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;

use decisioning_core::DispatchError;
use decisioning_core::EventSink;
use decisioning_core::OutboundEvent;
use serde_json::json;

// ============================================================================
// SECTION: Log Sink
// ============================================================================

/// Log-only outbound event sink.
pub struct LogSink<W: Write + Send> {
    /// Output writer for event records.
    writer: Mutex<W>,
}

impl<W: Write + Send> LogSink<W> {
    /// Creates a log sink over the provided writer.
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl<W: Write + Send> EventSink for LogSink<W> {
    fn dispatch(&self, event: OutboundEvent) -> Result<(), DispatchError> {
        let record = json!({
            "event": event.kind(),
            "request_id": event.request_id().map(ToString::to_string),
            "data": event.to_payload(),
        });
        let mut guard = self
            .writer
            .lock()
            .map_err(|_| DispatchError::DispatchFailed("log writer mutex poisoned".to_string()))?;
        serde_json::to_writer(&mut *guard, &record)
            .map_err(|err| DispatchError::DispatchFailed(err.to_string()))?;
        guard.write_all(b"\n").map_err(|err| DispatchError::DispatchFailed(err.to_string()))?;
        drop(guard);
        Ok(())
    }
}
