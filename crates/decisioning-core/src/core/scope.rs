// decisioning-core/src/core/scope.rs
// ============================================================================
// Module: Decision Scope Codec
// Description: Decision scope identifiers with a structured base64 form.
// Purpose: Validate, encode, and decode decision scopes used as cache keys.
// Dependencies: base64, serde, serde_json
// ============================================================================

//! ## Overview
//! A decision scope names a placement for which personalized content is
//! requested. The name is either a plain opaque string or the base64 encoding
//! of a compact JSON object carrying an activity identifier, a placement
//! identifier, and an optional item-count hint.
//! Invariants:
//! - Equality, ordering, and hashing are defined over the encoded name, so
//!   the scope can serve as a stable cache key.
//! - Encoding is deterministic: two scopes built from the same parts produce
//!   byte-identical names.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Wire Keys
// ============================================================================

/// JSON key for the activity identifier in a structured scope.
const ACTIVITY_ID: &str = "activityId";
/// Prefixed JSON key variant for the activity identifier.
const XDM_ACTIVITY_ID: &str = "xdm:activityId";
/// JSON key for the placement identifier in a structured scope.
const PLACEMENT_ID: &str = "placementId";
/// Prefixed JSON key variant for the placement identifier.
const XDM_PLACEMENT_ID: &str = "xdm:placementId";
/// JSON key for the item-count hint in a structured scope.
const ITEM_COUNT: &str = "itemCount";
/// Prefixed JSON key variant for the item-count hint.
const XDM_ITEM_COUNT: &str = "xdm:itemCount";

// ============================================================================
// SECTION: Decision Scope
// ============================================================================

/// Decision scope naming a placement for personalized content.
///
/// # Invariants
/// - `name` is the normalized encoded form and is the cache-key identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionScope {
    /// Encoded scope name.
    name: String,
}

/// Decoded contents of a structured decision scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeContents {
    /// Activity identifier.
    pub activity_id: String,
    /// Placement identifier.
    pub placement_id: String,
    /// Optional item-count hint.
    pub item_count: Option<u64>,
}

/// Serialization shape for the structured scope form.
///
/// Field order is fixed so that encoding is deterministic.
#[derive(Serialize)]
struct EncodedScope<'a> {
    /// Activity identifier.
    #[serde(rename = "activityId")]
    activity_id: &'a str,
    /// Placement identifier.
    #[serde(rename = "placementId")]
    placement_id: &'a str,
    /// Optional item-count hint.
    #[serde(rename = "itemCount", skip_serializing_if = "Option::is_none")]
    item_count: Option<u64>,
}

impl DecisionScope {
    /// Creates a scope from an already-encoded or plain opaque name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
        }
    }

    /// Creates a structured scope from activity and placement identifiers.
    #[must_use]
    pub fn from_parts(activity_id: &str, placement_id: &str) -> Self {
        Self::encode(activity_id, placement_id, None)
    }

    /// Creates a structured scope with an item-count hint.
    #[must_use]
    pub fn from_parts_with_count(activity_id: &str, placement_id: &str, item_count: u64) -> Self {
        Self::encode(activity_id, placement_id, Some(item_count))
    }

    /// Returns the encoded scope name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true when the scope can be used in a request.
    ///
    /// A scope is valid when its name is non-empty and, if the name decodes
    /// as the structured form, both the activity and placement identifiers
    /// are non-empty and the item-count hint, when present, is non-zero.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        if self.name.is_empty() {
            return false;
        }
        match self.decode() {
            Some(contents) => {
                !contents.activity_id.is_empty()
                    && !contents.placement_id.is_empty()
                    && contents.item_count != Some(0)
            }
            None => true,
        }
    }

    /// Decodes the structured form of this scope.
    ///
    /// Returns `None` when the name is not base64, not JSON, or not a JSON
    /// object. A plain opaque name is a valid scope that simply has no
    /// structured contents.
    #[must_use]
    pub fn decode(&self) -> Option<ScopeContents> {
        let bytes = STANDARD.decode(self.name.as_bytes()).ok()?;
        let text = String::from_utf8(bytes).ok()?;
        let value: Value = serde_json::from_str(&text).ok()?;
        let object = value.as_object()?;
        let activity_id = object
            .get(ACTIVITY_ID)
            .or_else(|| object.get(XDM_ACTIVITY_ID))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let placement_id = object
            .get(PLACEMENT_ID)
            .or_else(|| object.get(XDM_PLACEMENT_ID))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let item_count = object
            .get(ITEM_COUNT)
            .or_else(|| object.get(XDM_ITEM_COUNT))
            .and_then(Value::as_u64);
        Some(ScopeContents {
            activity_id,
            placement_id,
            item_count,
        })
    }

    /// Encodes the structured form with a deterministic field order.
    fn encode(activity_id: &str, placement_id: &str, item_count: Option<u64>) -> Self {
        let json = serde_json::to_string(&EncodedScope {
            activity_id,
            placement_id,
            item_count,
        })
        .unwrap_or_default();
        Self {
            name: STANDARD.encode(json.as_bytes()),
        }
    }
}

impl fmt::Display for DecisionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name.fmt(f)
    }
}

impl From<&str> for DecisionScope {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DecisionScope {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
