// decisioning-core/tests/worker.rs
// ============================================================================
// Module: Serial Worker Tests
// Description: Tests for receipt-order processing and batch atomicity.
// Purpose: Validate the worker's ordering and cache visibility guarantees.
// Dependencies: decisioning-core, serde_json
// ============================================================================
//! ## Overview
//! Drives a spawned worker from the test thread and asserts receipt-order
//! processing, shutdown draining, and that concurrent readers never observe
//! a partially-applied ingestion batch.

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

mod common;

use decisioning_core::ConfigSnapshot;
use decisioning_core::DecisionScope;
use decisioning_core::DecisioningEngine;
use decisioning_core::InboundEvent;
use decisioning_core::PropositionCache;
use decisioning_core::SerialWorker;
use decisioning_core::StaticConfigSource;
use serde_json::Value;

use common::RecordingDiagnostics;
use common::RecordingSink;
use common::decisions_response;
use common::html_item;
use common::proposition_unit;

/// Spawns a worker over a fresh engine, returning the shared cache handle.
fn spawn_worker() -> (SerialWorker, PropositionCache, RecordingSink) {
    let cache = PropositionCache::new();
    let sink = RecordingSink::new();
    let engine = DecisioningEngine::new(
        cache.clone(),
        sink.clone(),
        StaticConfigSource::new(ConfigSnapshot::default()),
        RecordingDiagnostics::new(),
    );
    (SerialWorker::spawn(engine), cache, sink)
}

/// Builds a decisions response covering the given number of scopes.
fn multi_scope_response(scope_count: usize) -> (Vec<DecisionScope>, Value) {
    let scopes: Vec<DecisionScope> =
        (0..scope_count).map(|index| DecisionScope::new(format!("scope-{index}"))).collect();
    let units: Vec<Value> = scopes
        .iter()
        .enumerate()
        .map(|(index, scope)| {
            proposition_unit(
                &format!("proposition-{index}"),
                scope.name(),
                vec![html_item(&format!("offer-{index}"), "<p>content</p>")],
            )
        })
        .collect();
    (scopes, decisions_response(units))
}

/// Verifies a clear submitted after an ingestion observes then clears it.
#[test]
fn ingest_then_clear_ends_empty() {
    let (worker, cache, sink) = spawn_worker();

    let (_scopes, response) = multi_scope_response(3);
    worker
        .submit(InboundEvent::ServiceResponse {
            data: response,
        })
        .expect("submit ingestion");
    worker.submit(InboundEvent::ClearRequest).expect("submit clear");
    worker.shutdown();

    assert!(cache.is_empty().expect("cache state"));
    assert_eq!(sink.events().len(), 1, "the ingestion notification was dispatched before the clear");
}

/// Verifies an ingestion submitted after a clear survives it.
#[test]
fn clear_then_ingest_ends_populated() {
    let (worker, cache, _sink) = spawn_worker();

    worker.submit(InboundEvent::ClearRequest).expect("submit clear");
    let (scopes, response) = multi_scope_response(3);
    worker
        .submit(InboundEvent::ServiceResponse {
            data: response,
        })
        .expect("submit ingestion");
    worker.shutdown();

    assert_eq!(cache.lookup(&scopes).expect("lookup").len(), 3);
}

/// Verifies shutdown drains every already-queued event.
#[test]
fn shutdown_drains_queued_events() {
    let (worker, cache, _sink) = spawn_worker();

    for index in 0..20 {
        let (_scopes, response) = multi_scope_response(index % 5 + 1);
        worker
            .submit(InboundEvent::ServiceResponse {
                data: response,
            })
            .expect("submit ingestion");
    }
    worker.shutdown();

    assert!(!cache.is_empty().expect("cache state"));
}

/// Verifies a concurrent reader observes all-or-nothing ingestion batches.
#[test]
fn concurrent_reader_never_observes_partial_batch() {
    let (worker, cache, _sink) = spawn_worker();

    let (scopes, response) = multi_scope_response(64);
    worker
        .submit(InboundEvent::ServiceResponse {
            data: response,
        })
        .expect("submit ingestion");

    // Poll from this thread while the worker ingests on its own thread.
    let mut observed_complete = false;
    for _ in 0..10_000 {
        let found = cache.lookup(&scopes).expect("lookup");
        assert!(
            found.is_empty() || found.len() == scopes.len(),
            "observed a partially-applied batch of {} entries",
            found.len()
        );
        if found.len() == scopes.len() {
            observed_complete = true;
            break;
        }
    }
    worker.shutdown();

    let found = cache.lookup(&scopes).expect("lookup");
    assert_eq!(found.len(), scopes.len());
    assert!(observed_complete || !found.is_empty());
}
