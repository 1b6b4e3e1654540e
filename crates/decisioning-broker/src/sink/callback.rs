// decisioning-broker/src/sink/callback.rs
// ============================================================================
// Module: Decisioning Callback Sink
// Description: Callback-based sink for synchronous delivery.
// Purpose: Invoke a user-provided function with outbound events.
// Dependencies: decisioning-core, std
// ============================================================================

//! ## Overview
//! [`CallbackSink`] delivers outbound events by invoking a user-supplied
//! function. The handler decides how events reach the host event bus.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use decisioning_core::DispatchError;
use decisioning_core::EventSink;
use decisioning_core::OutboundEvent;

// ============================================================================
// SECTION: Callback Sink
// ============================================================================

/// Callback-based outbound event sink.
#[derive(Clone)]
pub struct CallbackSink {
    /// Handler invoked with each outbound event.
    handler: Arc<CallbackHandler>,
}

/// Callback handler signature used by the sink.
type CallbackHandler = dyn Fn(OutboundEvent) -> Result<(), DispatchError> + Send + Sync;

impl CallbackSink {
    /// Creates a callback sink from a handler function.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(OutboundEvent) -> Result<(), DispatchError> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }
}

impl EventSink for CallbackSink {
    fn dispatch(&self, event: OutboundEvent) -> Result<(), DispatchError> {
        (self.handler)(event)
    }
}
