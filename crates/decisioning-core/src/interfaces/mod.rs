// decisioning-core/src/interfaces/mod.rs
// ============================================================================
// Module: Decisioning Interfaces
// Description: Backend-agnostic interfaces for dispatch, config, and logging.
// Purpose: Define the contract surfaces used by the decisioning runtime.
// Dependencies: crate::core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how the decisioning engine integrates with its host
//! without embedding backend-specific details: an event sink receiving
//! outbound events, a configuration source answering shared-state lookups,
//! and a diagnostics sink receiving structured log records. Implementations
//! must fail closed on delivery errors and never block on engine state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::OutboundEvent;

// ============================================================================
// SECTION: Event Sink
// ============================================================================

/// Errors emitted by event sinks.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Event delivery failed.
    #[error("event dispatch failed: {0}")]
    DispatchFailed(String),
}

/// Delivers outbound events to the host event bus.
pub trait EventSink: Send + Sync {
    /// Dispatches an outbound event.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when delivery fails.
    fn dispatch(&self, event: OutboundEvent) -> Result<(), DispatchError>;
}

// ============================================================================
// SECTION: Configuration Source
// ============================================================================

/// Configuration key holding the optional dataset-override identifier.
pub const DATASET_OVERRIDE_KEY: &str = "decisioning.datasetId";

/// Immutable snapshot of externally supplied configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSnapshot {
    /// Configuration values keyed by setting name.
    values: Map<String, Value>,
}

impl ConfigSnapshot {
    /// Creates a snapshot from a value map.
    #[must_use]
    pub const fn new(values: Map<String, Value>) -> Self {
        Self {
            values,
        }
    }

    /// Returns the raw value for a configuration key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns the configured dataset-override identifier, when present.
    #[must_use]
    pub fn dataset_override(&self) -> Option<&str> {
        self.values.get(DATASET_OVERRIDE_KEY).and_then(Value::as_str).filter(|id| !id.is_empty())
    }
}

/// Answers shared-configuration lookups for the engine.
///
/// Lookups are synchronous and independent of any cache state, so a
/// configuration read can never deadlock against the serial worker.
pub trait ConfigSource: Send + Sync {
    /// Returns the current configuration snapshot.
    ///
    /// `None` means required connectivity configuration is not available;
    /// requests that need configuration are abandoned in that case.
    fn snapshot(&self) -> Option<ConfigSnapshot>;
}

/// Static in-memory configuration source for wiring and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigSource {
    /// Snapshot returned by every lookup.
    snapshot: Option<ConfigSnapshot>,
}

impl StaticConfigSource {
    /// Creates a source answering with the provided snapshot.
    #[must_use]
    pub const fn new(snapshot: ConfigSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
        }
    }

    /// Creates a source with no configuration available.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self {
            snapshot: None,
        }
    }
}

impl ConfigSource for StaticConfigSource {
    fn snapshot(&self) -> Option<ConfigSnapshot> {
        self.snapshot.clone()
    }
}

// ============================================================================
// SECTION: Diagnostics Sink
// ============================================================================

/// Severity of a diagnostic record.
///
/// # Invariants
/// - Variants are stable for diagnostic labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    /// Expected drop or no-op worth tracing.
    Debug,
    /// Degraded behavior that continued.
    Warning,
    /// Failure that abandoned an operation.
    Error,
}

impl DiagnosticLevel {
    /// Returns a stable label for this level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured diagnostic record emitted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
    /// Record severity.
    pub level: DiagnosticLevel,
    /// Component that emitted the record.
    pub area: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// Receives structured diagnostic records.
///
/// The interface is intentionally dependency-light so hosts can plug in
/// their own logging backend without redesign.
pub trait DiagnosticsSink: Send + Sync {
    /// Records one diagnostic.
    fn record(&self, record: DiagnosticRecord);
}

/// Diagnostics sink that discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDiagnostics;

impl NoopDiagnostics {
    /// Creates a new no-op diagnostics sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DiagnosticsSink for NoopDiagnostics {
    fn record(&self, _record: DiagnosticRecord) {}
}
