//! Error types for workflow execution.

use thiserror::Error;
use vortex_graph::GraphError;

/// Fatal conditions that abort a run.
///
/// Per-node handler failures are not errors at this level; they are
/// aggregated on the [`crate::RunOutcome`].
#[derive(Debug, Error)]
pub enum EngineError {
  /// The workflow has no nodes.
  #[error("workflow has no nodes")]
  EmptyWorkflow,

  /// Every node has at least one incoming edge (all-node cycle or
  /// degenerate graph); there is nowhere to start.
  #[error("workflow has no entry nodes (every node has an incoming edge)")]
  NoEntryPoints,

  /// The node/edge lists violate a structural invariant.
  #[error(transparent)]
  Graph(#[from] GraphError),

  /// The run was cancelled at a wave boundary.
  #[error("workflow execution cancelled")]
  Cancelled,
}

/// Registration-time configuration errors for the handler registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
  #[error("handler already registered for node type: {0}")]
  DuplicateHandler(String),
}

/// A per-node execution failure reported by a handler.
///
/// The engine converts this into an error entry on the run outcome; it
/// never aborts the run.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HandlerError {
  message: String,
}

impl HandlerError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }

  pub fn message(&self) -> &str {
    &self.message
  }
}
