// decisioning-core/src/core/proposition.rs
// ============================================================================
// Module: Proposition Model
// Description: Decision-scope response units normalized from upstream payloads.
// Purpose: Parse both upstream proposition shapes into one representation.
// Dependencies: crate::core::offer, serde_json
// ============================================================================

//! ## Overview
//! A proposition bundles the offers returned for one decision scope together
//! with provenance metadata. Two upstream shapes carry the same logical
//! concept: first-party decisioning nests `activity`/`placement` sub-objects
//! with per-field etags, while third-party decisioning carries a flat
//! `scopeDetails` object. Both normalize into one representation with an
//! optional scope-details map.
//! Invariants:
//! - A proposition with zero display offers is not constructed; it carries
//!   no actionable content.
//! - Click-tracking items are preserved verbatim, never parsed as offers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::core::offer::Offer;

// ============================================================================
// SECTION: Wire Keys
// ============================================================================

/// JSON key for the proposition identifier.
const PAYLOAD_ID: &str = "id";
/// JSON key for the raw decision scope value.
const PAYLOAD_SCOPE: &str = "scope";
/// JSON key for the scope-details metadata map.
const PAYLOAD_SCOPE_DETAILS: &str = "scopeDetails";
/// JSON key for the proposition items list.
const PAYLOAD_ITEMS: &str = "items";
/// JSON key for an item schema.
const ITEM_SCHEMA: &str = "schema";

/// Schema identifying click-tracking measurement items.
///
/// Measurement items represent interaction tracking rather than displayable
/// content and are preserved verbatim instead of being parsed as offers.
pub const MEASUREMENT_SCHEMA: &str = "https://ns.adobe.com/personalization/measurement";

// ============================================================================
// SECTION: Proposition
// ============================================================================

/// Server-returned bundle of offers for one decision scope.
///
/// # Invariants
/// - `offers` is non-empty for constructed propositions.
/// - `scope` holds the raw scope value exactly as delivered upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposition {
    /// Proposition identifier.
    pub id: String,
    /// Raw decision scope value as delivered by the upstream.
    pub scope: String,
    /// Provenance metadata; empty when the upstream shape carries none.
    pub scope_details: Map<String, Value>,
    /// Ordered display offers.
    pub offers: Vec<Offer>,
    /// Click-tracking items preserved verbatim for tracking use.
    pub tracking_items: Vec<Value>,
}

impl Proposition {
    /// Parses one response payload unit into a proposition.
    ///
    /// Accepts both upstream shapes: the scope-details map is captured when
    /// present and left empty otherwise. Items parse individually through
    /// [`Offer::from_payload`]; malformed items are dropped without affecting
    /// their siblings. Returns `None` when the unit lacks a non-empty `id`
    /// or `scope`, or when no item parses into a display offer.
    #[must_use]
    pub fn from_payload(value: &Value) -> Option<Self> {
        let unit = value.as_object()?;
        let id = unit.get(PAYLOAD_ID).and_then(Value::as_str)?;
        if id.is_empty() {
            return None;
        }
        let scope = unit.get(PAYLOAD_SCOPE).and_then(Value::as_str)?;
        if scope.is_empty() {
            return None;
        }
        let scope_details = unit
            .get(PAYLOAD_SCOPE_DETAILS)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let mut offers = Vec::new();
        let mut tracking_items = Vec::new();
        if let Some(items) = unit.get(PAYLOAD_ITEMS).and_then(Value::as_array) {
            for item in items {
                if item.get(ITEM_SCHEMA).and_then(Value::as_str) == Some(MEASUREMENT_SCHEMA) {
                    tracking_items.push(item.clone());
                    continue;
                }
                if let Some(offer) = Offer::from_payload(item) {
                    offers.push(offer);
                }
            }
        }
        if offers.is_empty() {
            return None;
        }
        Some(Self {
            id: id.to_string(),
            scope: scope.to_string(),
            scope_details,
            offers,
            tracking_items,
        })
    }

    /// Renders this proposition as a response payload unit.
    #[must_use]
    pub fn to_payload(&self) -> Value {
        let mut unit = Map::new();
        unit.insert(PAYLOAD_ID.to_string(), json!(self.id));
        unit.insert(PAYLOAD_SCOPE.to_string(), json!(self.scope));
        if !self.scope_details.is_empty() {
            unit.insert(PAYLOAD_SCOPE_DETAILS.to_string(), Value::Object(self.scope_details.clone()));
        }
        let mut items: Vec<Value> = self.offers.iter().map(Offer::to_payload).collect();
        items.extend(self.tracking_items.iter().cloned());
        unit.insert(PAYLOAD_ITEMS.to_string(), Value::Array(items));
        Value::Object(unit)
    }

    /// Returns the number of items carried by a raw payload unit.
    ///
    /// Used by callers to detect how many items were dropped during parsing.
    #[must_use]
    pub fn payload_item_count(value: &Value) -> usize {
        value
            .as_object()
            .and_then(|unit| unit.get(PAYLOAD_ITEMS))
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }
}

// ============================================================================
// SECTION: Proposition Reference
// ============================================================================

/// Summary reference to a proposition used by interaction tracking.
///
/// # Invariants
/// - `id` and `scope` are non-empty for parsed references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropositionReference {
    /// Referenced proposition identifier.
    pub id: String,
    /// Raw decision scope of the referenced proposition.
    pub scope: String,
    /// Provenance metadata of the referenced proposition.
    pub scope_details: Map<String, Value>,
    /// Identifiers of the referenced items.
    pub item_ids: Vec<String>,
}

impl PropositionReference {
    /// Builds a reference to a parsed proposition.
    ///
    /// When `item_ids` is empty the reference covers every display offer in
    /// the proposition.
    #[must_use]
    pub fn for_proposition(proposition: &Proposition, item_ids: Vec<String>) -> Self {
        let item_ids = if item_ids.is_empty() {
            proposition.offers.iter().map(|offer| offer.id.clone()).collect()
        } else {
            item_ids
        };
        Self {
            id: proposition.id.clone(),
            scope: proposition.scope.clone(),
            scope_details: proposition.scope_details.clone(),
            item_ids,
        }
    }

    /// Parses a reference from a proposition-interactions payload entry.
    ///
    /// Returns `None` when the entry lacks a non-empty `id` or `scope`.
    #[must_use]
    pub fn from_payload(value: &Value) -> Option<Self> {
        let entry = value.as_object()?;
        let id = entry.get(PAYLOAD_ID).and_then(Value::as_str)?;
        if id.is_empty() {
            return None;
        }
        let scope = entry.get(PAYLOAD_SCOPE).and_then(Value::as_str)?;
        if scope.is_empty() {
            return None;
        }
        let scope_details = entry
            .get(PAYLOAD_SCOPE_DETAILS)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let item_ids = entry
            .get(PAYLOAD_ITEMS)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(id) => Some(id.clone()),
                        Value::Object(fields) => fields
                            .get(PAYLOAD_ID)
                            .and_then(Value::as_str)
                            .map(str::to_string),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();
        Some(Self {
            id: id.to_string(),
            scope: scope.to_string(),
            scope_details,
            item_ids,
        })
    }

    /// Renders this reference for the structured tracking payload.
    #[must_use]
    pub fn to_payload(&self) -> Value {
        let mut entry = Map::new();
        entry.insert(PAYLOAD_ID.to_string(), json!(self.id));
        entry.insert(PAYLOAD_SCOPE.to_string(), json!(self.scope));
        if !self.scope_details.is_empty() {
            entry
                .insert(PAYLOAD_SCOPE_DETAILS.to_string(), Value::Object(self.scope_details.clone()));
        }
        let items: Vec<Value> = self.item_ids.iter().map(|id| json!({ (PAYLOAD_ID): id })).collect();
        entry.insert(PAYLOAD_ITEMS.to_string(), Value::Array(items));
        Value::Object(entry)
    }
}
