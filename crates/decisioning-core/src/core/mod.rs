// decisioning-core/src/core/mod.rs
// ============================================================================
// Module: Decisioning Core Types
// Description: Domain model, codecs, and payload builders for decisioning.
// Purpose: Provide stable types for scopes, offers, propositions, and events.
// Dependencies: base64, serde, serde_json
// ============================================================================

//! ## Overview
//! Core types define the decisioning domain model: decision scopes with their
//! structured codec, offers and propositions normalized from heterogeneous
//! upstream payloads, the typed event model, and the outbound request
//! builders. These types are the canonical source of truth for any derived
//! API surfaces.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod events;
pub mod identifiers;
pub mod offer;
pub mod proposition;
pub mod requests;
pub mod scope;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use events::DECISIONS_MARKER;
pub use events::InboundEvent;
pub use events::InteractionType;
pub use events::OutboundEvent;
pub use events::REQUEST_TYPE_GET;
pub use events::REQUEST_TYPE_TRACK;
pub use events::REQUEST_TYPE_UPDATE;
pub use events::ResponseError;
pub use identifiers::RequestId;
pub use offer::Offer;
pub use offer::OfferType;
pub use proposition::MEASUREMENT_SCHEMA;
pub use proposition::Proposition;
pub use proposition::PropositionReference;
pub use requests::build_interaction_track;
pub use requests::build_personalization_query;
pub use requests::scopes_from_request;
pub use requests::valid_scopes;
pub use scope::DecisionScope;
pub use scope::ScopeContents;
