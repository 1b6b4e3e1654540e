// decisioning-core/tests/cache.rs
// ============================================================================
// Module: Proposition Cache Tests
// Description: Tests for atomic batch merge, lookup order, and clearing.
// Purpose: Validate the scoped cache operations behave deterministically.
// Dependencies: decisioning-core, serde_json
// ============================================================================
//! ## Overview
//! Ensures the proposition cache upserts batches atomically, answers lookups
//! in request order, omits misses, and clears fully.

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

use std::collections::BTreeMap;

use decisioning_core::DecisionScope;
use decisioning_core::Offer;
use decisioning_core::OfferType;
use decisioning_core::Proposition;
use decisioning_core::PropositionCache;
use serde_json::Map;

/// Builds a proposition with one text offer for the given scope.
fn sample_proposition(id: &str, scope: &str) -> Proposition {
    Proposition {
        id: id.to_string(),
        scope: scope.to_string(),
        scope_details: Map::new(),
        offers: vec![Offer {
            id: format!("{id}-offer"),
            etag: None,
            schema: None,
            offer_type: OfferType::Text,
            language: None,
            content: "content".to_string(),
            characteristics: None,
        }],
        tracking_items: Vec::new(),
    }
}

/// Builds a single-entry batch for the given scope.
fn batch_for(scope: &str, proposition: Proposition) -> BTreeMap<DecisionScope, Proposition> {
    let mut batch = BTreeMap::new();
    batch.insert(DecisionScope::new(scope), proposition);
    batch
}

/// Verifies merge then lookup returns the stored proposition.
#[test]
fn merge_and_lookup_round_trip() {
    let cache = PropositionCache::new();
    cache.merge(batch_for("scope-a", sample_proposition("p1", "scope-a"))).expect("merge");

    let found = cache.lookup(&[DecisionScope::new("scope-a")]).expect("lookup");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "p1");
}

/// Verifies lookups preserve the requested scope order and omit misses.
#[test]
fn lookup_preserves_request_order_and_omits_misses() {
    let cache = PropositionCache::new();
    let mut batch = BTreeMap::new();
    batch.insert(DecisionScope::new("scope-a"), sample_proposition("p-a", "scope-a"));
    batch.insert(DecisionScope::new("scope-b"), sample_proposition("p-b", "scope-b"));
    cache.merge(batch).expect("merge");

    let found = cache
        .lookup(&[
            DecisionScope::new("scope-b"),
            DecisionScope::new("scope-missing"),
            DecisionScope::new("scope-a"),
        ])
        .expect("lookup");
    let ids: Vec<&str> = found.iter().map(|proposition| proposition.id.as_str()).collect();
    assert_eq!(ids, vec!["p-b", "p-a"]);
}

/// Verifies a later merge replaces the earlier entry for the same scope.
#[test]
fn merge_replaces_prior_entry_wholesale() {
    let cache = PropositionCache::new();
    cache.merge(batch_for("scope-a", sample_proposition("p1", "scope-a"))).expect("first merge");
    cache.merge(batch_for("scope-a", sample_proposition("p2", "scope-a"))).expect("second merge");

    let found = cache.lookup(&[DecisionScope::new("scope-a")]).expect("lookup");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "p2");
    assert_eq!(found[0].offers.len(), 1, "offer lists are replaced, not merged");
    assert_eq!(cache.len().expect("len"), 1);
}

/// Verifies clearing empties the cache in full.
#[test]
fn clear_empties_the_cache() {
    let cache = PropositionCache::new();
    cache.merge(batch_for("scope-a", sample_proposition("p1", "scope-a"))).expect("merge");
    assert!(!cache.is_empty().expect("cache state"));

    cache.clear().expect("clear");
    assert!(cache.is_empty().expect("cache state"));
    assert!(cache.lookup(&[DecisionScope::new("scope-a")]).expect("lookup").is_empty());
}

/// Verifies clones share the same underlying entries.
#[test]
fn clones_share_entries() {
    let cache = PropositionCache::new();
    let handle = cache.clone();
    cache.merge(batch_for("scope-a", sample_proposition("p1", "scope-a"))).expect("merge");

    let found = handle.lookup(&[DecisionScope::new("scope-a")]).expect("lookup");
    assert_eq!(found.len(), 1);
}
