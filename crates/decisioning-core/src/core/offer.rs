// decisioning-core/src/core/offer.rs
// ============================================================================
// Module: Offer Model
// Description: Normalized content items parsed from personalization payloads.
// Purpose: Turn heterogeneous response items into a uniform offer value type.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! An offer is one normalized content item belonging to a proposition. The
//! parser is permissive of missing optional fields and strict on required
//! ones: a malformed item yields no offer rather than an error, so sibling
//! items in the same payload are unaffected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde_json::Map;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Wire Keys
// ============================================================================

/// JSON key for the item identifier.
const ITEM_ID: &str = "id";
/// JSON key for the item etag.
const ITEM_ETAG: &str = "etag";
/// JSON key for the item schema.
const ITEM_SCHEMA: &str = "schema";
/// JSON key for the nested item data block.
const ITEM_DATA: &str = "data";
/// JSON key for the item data format.
const ITEM_DATA_FORMAT: &str = "format";
/// JSON key for the inline item content.
const ITEM_DATA_CONTENT: &str = "content";
/// JSON key for the item delivery URL.
const ITEM_DATA_DELIVERY_URL: &str = "deliveryURL";
/// JSON key for the item language list.
const ITEM_DATA_LANGUAGE: &str = "language";
/// JSON key for the item characteristics map.
const ITEM_DATA_CHARACTERISTICS: &str = "characteristics";

// ============================================================================
// SECTION: Offer Type
// ============================================================================

/// Content type of an offer, derived from the item data format.
///
/// # Invariants
/// - Variants are stable for payload round-trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferType {
    /// Unrecognized or absent format.
    Unknown,
    /// JSON content.
    Json,
    /// Plain-text content.
    Text,
    /// HTML content.
    Html,
    /// Image content delivered by URL.
    Image,
}

impl OfferType {
    /// Maps an item data format to an offer type.
    ///
    /// Unrecognized formats map to [`OfferType::Unknown`] rather than
    /// failing the parse.
    #[must_use]
    pub fn from_format(format: &str) -> Self {
        match format {
            "application/json" => Self::Json,
            "text/plain" => Self::Text,
            "text/html" => Self::Html,
            "image" => Self::Image,
            _ => Self::Unknown,
        }
    }

    /// Returns the item data format for this offer type.
    #[must_use]
    pub const fn as_format(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Text => "text/plain",
            Self::Html => "text/html",
            Self::Image => "image",
            Self::Unknown => "",
        }
    }
}

// ============================================================================
// SECTION: Offer
// ============================================================================

/// Normalized content item belonging to a proposition.
///
/// # Invariants
/// - `id` and `content` are non-empty for parsed offers.
/// - `content` is always a string; structured inline content is serialized
///   to compact JSON during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offer {
    /// Offer identifier.
    pub id: String,
    /// Optional provenance etag.
    pub etag: Option<String>,
    /// Optional schema identifying the content shape.
    pub schema: Option<String>,
    /// Content type derived from the item data format.
    pub offer_type: OfferType,
    /// Optional ordered list of locale tags.
    pub language: Option<Vec<String>>,
    /// Offer content: raw text, JSON serialized as a string, or a delivery URL.
    pub content: String,
    /// Optional characteristics map.
    pub characteristics: Option<BTreeMap<String, String>>,
}

impl Offer {
    /// Parses one response payload item into an offer.
    ///
    /// Returns `None` when the item lacks a non-empty `id`, a nested data
    /// block whose `id` matches the outer `id`, a `format`, or a resolvable
    /// content value. Inline content is preferred over the delivery URL;
    /// structured inline content is serialized to compact JSON.
    #[must_use]
    pub fn from_payload(value: &Value) -> Option<Self> {
        let item = value.as_object()?;
        if item.is_empty() {
            return None;
        }
        let id = item.get(ITEM_ID).and_then(Value::as_str)?;
        if id.is_empty() {
            return None;
        }
        let data = item.get(ITEM_DATA).and_then(Value::as_object)?;
        if data.is_empty() {
            return None;
        }
        let nested_id = data.get(ITEM_ID).and_then(Value::as_str)?;
        if nested_id != id {
            return None;
        }
        let format = data.get(ITEM_DATA_FORMAT).and_then(Value::as_str)?;
        if format.is_empty() {
            return None;
        }
        let content = resolve_content(data)?;
        let language = data.get(ITEM_DATA_LANGUAGE).and_then(Value::as_array).map(|entries| {
            entries.iter().filter_map(Value::as_str).map(str::to_string).collect()
        });
        let characteristics =
            data.get(ITEM_DATA_CHARACTERISTICS).and_then(Value::as_object).map(|entries| {
                entries
                    .iter()
                    .filter_map(|(key, value)| {
                        value.as_str().map(|text| (key.clone(), text.to_string()))
                    })
                    .collect()
            });
        Some(Self {
            id: id.to_string(),
            etag: item.get(ITEM_ETAG).and_then(Value::as_str).map(str::to_string),
            schema: item.get(ITEM_SCHEMA).and_then(Value::as_str).map(str::to_string),
            offer_type: OfferType::from_format(format),
            language,
            content,
            characteristics,
        })
    }

    /// Renders this offer as a response payload item.
    #[must_use]
    pub fn to_payload(&self) -> Value {
        let mut item = Map::new();
        item.insert(ITEM_ID.to_string(), json!(self.id));
        if let Some(etag) = &self.etag {
            item.insert(ITEM_ETAG.to_string(), json!(etag));
        }
        if let Some(schema) = &self.schema {
            item.insert(ITEM_SCHEMA.to_string(), json!(schema));
        }
        let mut data = Map::new();
        data.insert(ITEM_ID.to_string(), json!(self.id));
        data.insert(ITEM_DATA_FORMAT.to_string(), json!(self.offer_type.as_format()));
        data.insert(ITEM_DATA_CONTENT.to_string(), json!(self.content));
        if let Some(language) = &self.language {
            data.insert(ITEM_DATA_LANGUAGE.to_string(), json!(language));
        }
        if let Some(characteristics) = &self.characteristics {
            data.insert(ITEM_DATA_CHARACTERISTICS.to_string(), json!(characteristics));
        }
        item.insert(ITEM_DATA.to_string(), Value::Object(data));
        Value::Object(item)
    }
}

/// Resolves the content value for an item data block.
///
/// Inline content wins over the delivery URL. Structured inline content is
/// serialized to compact JSON; content of any other shape fails the parse.
fn resolve_content(data: &Map<String, Value>) -> Option<String> {
    if let Some(content) = data.get(ITEM_DATA_CONTENT) {
        return match content {
            Value::String(text) => Some(text.clone()),
            Value::Object(_) => serde_json::to_string(content).ok(),
            _ => None,
        };
    }
    data.get(ITEM_DATA_DELIVERY_URL).and_then(Value::as_str).map(str::to_string)
}
