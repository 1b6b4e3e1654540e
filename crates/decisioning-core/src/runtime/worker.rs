// decisioning-core/src/runtime/worker.rs
// ============================================================================
// Module: Serial Worker
// Description: Single-thread event loop owning the decisioning engine.
// Purpose: Process inbound events serially in receipt order.
// Dependencies: crate::{core, interfaces, runtime}, std, thiserror
// ============================================================================

//! ## Overview
//! The serial worker is the scheduling model made concrete: one dedicated
//! thread owns the engine and drains an unbounded channel of inbound events
//! in the order they were submitted. Application-facing callers enqueue from
//! arbitrary threads; enqueue never blocks on cache state.
//! Invariants:
//! - Events are processed in receipt order; a clear submitted after an
//!   ingestion observes the ingested data, then clears it.
//! - Dropping the worker drains already-queued events before joining.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::mpsc::Receiver;
use std::sync::mpsc::Sender;
use std::sync::mpsc::channel;
use std::thread::JoinHandle;

use thiserror::Error;

use crate::core::InboundEvent;
use crate::interfaces::ConfigSource;
use crate::interfaces::DiagnosticsSink;
use crate::interfaces::EventSink;
use crate::runtime::engine::DecisioningEngine;

// ============================================================================
// SECTION: Worker Errors
// ============================================================================

/// Errors emitted by the serial worker.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// Worker queue is closed; the worker has shut down.
    #[error("worker queue closed")]
    QueueClosed,
}

// ============================================================================
// SECTION: Serial Worker
// ============================================================================

/// Single-thread worker driving a decisioning engine.
///
/// # Invariants
/// - The owned thread is the only caller of the engine, so the engine never
///   observes concurrent event handling.
#[derive(Debug)]
pub struct SerialWorker {
    /// Submission side of the event queue.
    sender: Option<Sender<InboundEvent>>,
    /// Join handle for the worker thread.
    handle: Option<JoinHandle<()>>,
}

impl SerialWorker {
    /// Spawns a worker thread that drains events into the engine.
    #[must_use]
    pub fn spawn<S, C, D>(engine: DecisioningEngine<S, C, D>) -> Self
    where
        S: EventSink + 'static,
        C: ConfigSource + 'static,
        D: DiagnosticsSink + 'static,
    {
        let (sender, receiver): (Sender<InboundEvent>, Receiver<InboundEvent>) = channel();
        let handle = std::thread::spawn(move || {
            while let Ok(event) = receiver.recv() {
                engine.handle(event);
            }
        });
        Self {
            sender: Some(sender),
            handle: Some(handle),
        }
    }

    /// Enqueues an inbound event for serial processing.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::QueueClosed`] when the worker has shut down.
    pub fn submit(&self, event: InboundEvent) -> Result<(), WorkerError> {
        self.sender
            .as_ref()
            .ok_or(WorkerError::QueueClosed)?
            .send(event)
            .map_err(|_| WorkerError::QueueClosed)
    }

    /// Shuts the worker down, draining already-queued events first.
    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for SerialWorker {
    fn drop(&mut self) {
        // Closing the sender ends the receive loop after the queue drains.
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
