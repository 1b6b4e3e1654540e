// decisioning-core/src/core/events.rs
// ============================================================================
// Module: Decisioning Events
// Description: Typed inbound and outbound event model with correlation.
// Purpose: Carry request/response correlation as explicit identifier fields.
// Dependencies: crate::core, serde_json
// ============================================================================

//! ## Overview
//! The event model replaces host event-bus callbacks with explicit message
//! passing: the engine consumes [`InboundEvent`] values and writes
//! [`OutboundEvent`] values to an event sink. Correlated responses carry the
//! originating [`RequestId`] so exactly one waiting caller resolves;
//! notifications carry no correlation identifier and are broadcast.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde_json::Value;
use serde_json::json;

use crate::core::identifiers::RequestId;
use crate::core::proposition::Proposition;

// ============================================================================
// SECTION: Wire Markers
// ============================================================================

/// Payload marker identifying a personalization-decisions response.
pub const DECISIONS_MARKER: &str = "personalization:decisions";

/// Request-type value for update-propositions requests.
pub const REQUEST_TYPE_UPDATE: &str = "updatepropositions";
/// Request-type value for get-propositions requests.
pub const REQUEST_TYPE_GET: &str = "getpropositions";
/// Request-type value for track-propositions requests.
pub const REQUEST_TYPE_TRACK: &str = "trackpropositions";

/// JSON key carrying the propositions list in notifications and responses.
const PROPOSITIONS: &str = "propositions";
/// JSON key carrying the error code in correlated error responses.
const RESPONSE_ERROR: &str = "responseerror";

// ============================================================================
// SECTION: Inbound Events
// ============================================================================

/// Inbound event consumed by the decisioning engine.
///
/// # Invariants
/// - Application requests carry a unique [`RequestId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Application request carrying a `requesttype` discriminator in its data.
    Request {
        /// Correlation identifier assigned by the caller.
        request_id: RequestId,
        /// Free-form request data.
        data: Value,
    },
    /// Domain-specific request to clear cached propositions.
    ClearRequest,
    /// Cross-cutting identities-reset signal.
    IdentityReset,
    /// Response content from the personalization service.
    ServiceResponse {
        /// Raw response data; must carry the decisions marker to apply.
        data: Value,
    },
    /// Error response from the personalization service.
    ServiceError {
        /// Raw error data with type, detail, and status fields.
        data: Value,
    },
}

// ============================================================================
// SECTION: Interaction Type
// ============================================================================

/// Interaction kind reported by tracking requests.
///
/// # Invariants
/// - Variants are stable for experience-event labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionType {
    /// Propositions were displayed.
    Display,
    /// A user interacted with propositions.
    Interact,
}

impl InteractionType {
    /// Parses an interaction name from a tracking request payload.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "display" => Some(Self::Display),
            "interact" => Some(Self::Interact),
            _ => None,
        }
    }

    /// Returns the experience-event type for this interaction.
    #[must_use]
    pub const fn as_event_type(self) -> &'static str {
        match self {
            Self::Display => "decisioning.propositionDisplay",
            Self::Interact => "decisioning.propositionInteract",
        }
    }
}

// ============================================================================
// SECTION: Response Errors
// ============================================================================

/// Error codes carried by correlated error responses.
///
/// # Invariants
/// - Codes and labels are stable for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseError {
    /// Unexpected internal failure.
    Unexpected,
    /// Request carried no valid decision scopes or was malformed.
    InvalidRequest,
    /// Required connectivity configuration is not available.
    ConfigurationMissing,
}

impl ResponseError {
    /// Returns the stable wire code for this error.
    #[must_use]
    pub const fn code(self) -> u64 {
        match self {
            Self::Unexpected => 0,
            Self::InvalidRequest => 1,
            Self::ConfigurationMissing => 2,
        }
    }

    /// Returns a stable label for this error.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unexpected => "unexpected",
            Self::InvalidRequest => "invalid_request",
            Self::ConfigurationMissing => "configuration_missing",
        }
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// SECTION: Outbound Events
// ============================================================================

/// Outbound event produced by the decisioning engine.
///
/// # Invariants
/// - `Response` is the only correlated variant; `Notification` is broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    /// Personalization query dispatched to the service; fire and forget.
    PersonalizationQuery {
        /// Assembled query payload.
        payload: Value,
    },
    /// Interaction-tracking request dispatched to the service.
    InteractionTrack {
        /// Assembled tracking payload.
        payload: Value,
    },
    /// Broadcast notification that fresh propositions were ingested.
    Notification {
        /// Newly-ingested propositions, not the whole cache.
        propositions: Vec<Proposition>,
    },
    /// Correlated response to a waiting caller.
    Response {
        /// Identifier of the originating request.
        request_id: RequestId,
        /// Propositions on success, error code on failure.
        result: Result<Vec<Proposition>, ResponseError>,
    },
}

impl OutboundEvent {
    /// Returns a stable label for the event kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PersonalizationQuery {
                ..
            } => "personalization_query",
            Self::InteractionTrack {
                ..
            } => "interaction_track",
            Self::Notification {
                ..
            } => "notification",
            Self::Response {
                ..
            } => "response",
        }
    }

    /// Renders the event data payload for host event-bus delivery.
    #[must_use]
    pub fn to_payload(&self) -> Value {
        match self {
            Self::PersonalizationQuery {
                payload,
            }
            | Self::InteractionTrack {
                payload,
            } => payload.clone(),
            Self::Notification {
                propositions,
            } => {
                let units: Vec<Value> = propositions.iter().map(Proposition::to_payload).collect();
                json!({ (PROPOSITIONS): units })
            }
            Self::Response {
                result, ..
            } => match result {
                Ok(propositions) => {
                    let units: Vec<Value> =
                        propositions.iter().map(Proposition::to_payload).collect();
                    json!({ (PROPOSITIONS): units })
                }
                Err(error) => json!({ (RESPONSE_ERROR): error.code() }),
            },
        }
    }

    /// Returns the correlation identifier for correlated events.
    #[must_use]
    pub const fn request_id(&self) -> Option<&RequestId> {
        match self {
            Self::Response {
                request_id, ..
            } => Some(request_id),
            _ => None,
        }
    }
}
