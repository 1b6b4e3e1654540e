// decisioning-broker/src/diagnostics.rs
// ============================================================================
// Module: Writer Diagnostics
// Description: JSON-line diagnostics sink over any writer.
// Purpose: Persist engine diagnostics without a logging framework dependency.
// Dependencies: decisioning-core, serde_json, std
// ============================================================================

//! ## Overview
//! `WriterDiagnostics` records each engine diagnostic as one JSON line on the
//! wrapped writer. Records that fail to write are discarded; diagnostics must
//! never disturb event processing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;

use decisioning_core::DiagnosticRecord;
use decisioning_core::DiagnosticsSink;
use serde_json::json;

// ============================================================================
// SECTION: Writer Diagnostics
// ============================================================================

/// Diagnostics sink writing JSON lines to a writer.
pub struct WriterDiagnostics<W: Write + Send> {
    /// Output writer for diagnostic records.
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterDiagnostics<W> {
    /// Creates a diagnostics sink over the provided writer.
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl<W: Write + Send> DiagnosticsSink for WriterDiagnostics<W> {
    fn record(&self, record: DiagnosticRecord) {
        let line = json!({
            "level": record.level.as_str(),
            "area": record.area,
            "message": record.message,
        });
        if let Ok(mut guard) = self.writer.lock() {
            if serde_json::to_writer(&mut *guard, &line).is_ok() {
                let _ = guard.write_all(b"\n");
            }
        }
    }
}
