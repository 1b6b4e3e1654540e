// decisioning-core/src/runtime/cache.rs
// ============================================================================
// Module: Proposition Cache
// Description: Mutex-guarded in-memory cache keyed by decision scope.
// Purpose: Provide atomic batch ingestion and scoped lookups.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The proposition cache maps decision scopes to their latest proposition.
//! The raw map is never exposed; callers use the scoped merge, lookup, and
//! clear operations.
//! Invariants:
//! - At most one proposition per scope at any time.
//! - Batch ingestion is atomic: no reader observes a partially-applied batch.
//! - A later proposition for a scope replaces the earlier one wholesale;
//!   offer lists are never merged across writes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use thiserror::Error;

use crate::core::DecisionScope;
use crate::core::Proposition;

// ============================================================================
// SECTION: Cache Errors
// ============================================================================

/// Errors emitted by proposition cache operations.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Cache lock was poisoned by a panicking holder.
    #[error("proposition cache mutex poisoned: {0}")]
    Poisoned(String),
}

// ============================================================================
// SECTION: Proposition Cache
// ============================================================================

/// Shared in-memory proposition cache keyed by decision scope.
///
/// Clones share the same underlying map, so a lookup handle can be held
/// outside the serial worker while the worker performs ingestion.
#[derive(Debug, Default, Clone)]
pub struct PropositionCache {
    /// Cache entries protected by a mutex.
    entries: Arc<Mutex<BTreeMap<DecisionScope, Proposition>>>,
}

impl PropositionCache {
    /// Creates a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// Atomically upserts a batch of propositions.
    ///
    /// Every entry replaces any prior proposition for its scope. The whole
    /// batch is applied under one lock acquisition, so concurrent lookups
    /// observe either none or all of it.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Poisoned`] when the cache lock is poisoned.
    pub fn merge(&self, batch: BTreeMap<DecisionScope, Proposition>) -> Result<(), CacheError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| CacheError::Poisoned("merge lock failed".to_string()))?;
        guard.extend(batch);
        drop(guard);
        Ok(())
    }

    /// Returns cached propositions for the requested scopes, in request order.
    ///
    /// Scopes absent from the cache are silently omitted.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Poisoned`] when the cache lock is poisoned.
    pub fn lookup(&self, scopes: &[DecisionScope]) -> Result<Vec<Proposition>, CacheError> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| CacheError::Poisoned("lookup lock failed".to_string()))?;
        Ok(scopes.iter().filter_map(|scope| guard.get(scope).cloned()).collect())
    }

    /// Replaces the cache contents with an empty map.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Poisoned`] when the cache lock is poisoned.
    pub fn clear(&self) -> Result<(), CacheError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| CacheError::Poisoned("clear lock failed".to_string()))?;
        guard.clear();
        drop(guard);
        Ok(())
    }

    /// Returns the number of cached scopes.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Poisoned`] when the cache lock is poisoned.
    pub fn len(&self) -> Result<usize, CacheError> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| CacheError::Poisoned("len lock failed".to_string()))?;
        Ok(guard.len())
    }

    /// Returns true when the cache holds no propositions.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Poisoned`] when the cache lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len()? == 0)
    }
}
