// decisioning-broker/src/sink/channel.rs
// ============================================================================
// Module: Decisioning Channel Sink
// Description: Channel-based sink for asynchronous delivery.
// Purpose: Send outbound events through a Tokio mpsc channel.
// Dependencies: decisioning-core, tokio
// ============================================================================

//! ## Overview
//! [`ChannelSink`] delivers outbound events by sending them into a
//! `tokio::sync::mpsc` channel.
//! Invariants:
//! - A successful dispatch enqueues exactly one event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use decisioning_core::DispatchError;
use decisioning_core::EventSink;
use decisioning_core::OutboundEvent;
use tokio::sync::mpsc::Sender;

// ============================================================================
// SECTION: Channel Sink
// ============================================================================

/// Channel-based outbound event sink.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    /// Sender used to enqueue outbound events.
    sender: Sender<OutboundEvent>,
}

impl ChannelSink {
    /// Creates a channel sink over the provided sender.
    #[must_use]
    pub const fn new(sender: Sender<OutboundEvent>) -> Self {
        Self {
            sender,
        }
    }
}

impl EventSink for ChannelSink {
    fn dispatch(&self, event: OutboundEvent) -> Result<(), DispatchError> {
        self.sender.try_send(event).map_err(|err| DispatchError::DispatchFailed(err.to_string()))
    }
}
