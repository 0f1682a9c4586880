//! Execution events and notifiers for observability.
//!
//! The engine emits one event per run and node transition; consumers decide
//! what to do with them (render progress in a UI, persist, stream, ignore).

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Events emitted during a workflow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExecutionEvent {
  WorkflowStarted {
    execution_id: String,
    workflow_id: String,
  },

  NodeStarted {
    execution_id: String,
    node_id: String,
  },

  NodeCompleted {
    execution_id: String,
    node_id: String,
    output: String,
  },

  NodeFailed {
    execution_id: String,
    node_id: String,
    error: String,
  },

  WorkflowCompleted {
    execution_id: String,
  },

  /// The run aborted after it started (cancellation).
  WorkflowFailed {
    execution_id: String,
    error: String,
  },
}

/// Trait for receiving execution events.
///
/// The engine calls `notify` for each event; implementations must not
/// block.
pub trait ExecutionNotifier: Send + Sync {
  fn notify(&self, event: ExecutionEvent);
}

/// A no-op notifier that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl ExecutionNotifier for NoopNotifier {
  fn notify(&self, _event: ExecutionEvent) {}
}

/// A notifier that sends events to an unbounded channel.
///
/// Unbounded so a slow consumer cannot stall the engine; event volume is a
/// handful per node, so growth stays small.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  sender: mpsc::UnboundedSender<ExecutionEvent>,
}

impl ChannelNotifier {
  pub fn new(sender: mpsc::UnboundedSender<ExecutionEvent>) -> Self {
    Self { sender }
  }
}

impl ExecutionNotifier for ChannelNotifier {
  fn notify(&self, event: ExecutionEvent) {
    // The receiver may already be gone; dropping the event is fine.
    let _ = self.sender.send(event);
  }
}
