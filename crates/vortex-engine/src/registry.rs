//! Node handler registry.
//!
//! Node types are dispatched through a registry keyed by the node's type
//! string. The set is closed at startup: registration rejects duplicate
//! keys, so a misconfigured handler table surfaces before any run. A type
//! missing at run time is a recorded per-node error, not a silent no-op.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use vortex_graph::Node;

use crate::error::{HandlerError, RegistryError};

/// Output strings gathered from a node's upstream nodes.
///
/// Entry nodes (and nodes whose every predecessor failed) see [`None`];
/// single-predecessor nodes see the one output; fan-in nodes see every
/// available output in edge declaration order. Merging multiple inputs is
/// a per-handler policy, not an engine policy.
///
/// [`None`]: UpstreamInput::None
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamInput {
  None,
  Single(String),
  Many(Vec<String>),
}

impl UpstreamInput {
  /// Collapse a list of upstream outputs into the matching variant.
  pub fn from_outputs(mut outputs: Vec<String>) -> Self {
    match outputs.len() {
      0 => Self::None,
      1 => Self::Single(outputs.remove(0)),
      _ => Self::Many(outputs),
    }
  }

  pub fn is_none(&self) -> bool {
    matches!(self, Self::None)
  }

  /// All upstream outputs, in edge declaration order.
  pub fn as_slice(&self) -> &[String] {
    match self {
      Self::None => &[],
      Self::Single(output) => std::slice::from_ref(output),
      Self::Many(outputs) => outputs.as_slice(),
    }
  }

  /// First upstream output, if any.
  pub fn first(&self) -> Option<&str> {
    self.as_slice().first().map(String::as_str)
  }
}

/// Type-specific execution logic for one node kind.
///
/// A handler receives the node snapshot and its gathered upstream outputs
/// and returns the node's output string; the engine assembles the
/// [`crate::NodeResult`]. Failing returns a [`HandlerError`], which the
/// engine records against the node without stopping the run.
#[async_trait]
pub trait NodeHandler: Send + Sync {
  async fn execute(&self, node: &Node, upstream: UpstreamInput) -> Result<String, HandlerError>;
}

/// Registry mapping node type keys to their handlers.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
  handlers: HashMap<String, Arc<dyn NodeHandler>>,
}

impl HandlerRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a handler under a node type key.
  ///
  /// Fails if the key is already taken.
  pub fn register(
    &mut self,
    node_type: impl Into<String>,
    handler: Arc<dyn NodeHandler>,
  ) -> Result<(), RegistryError> {
    let node_type = node_type.into();
    if self.handlers.contains_key(&node_type) {
      return Err(RegistryError::DuplicateHandler(node_type));
    }
    self.handlers.insert(node_type, handler);
    Ok(())
  }

  /// Look up the handler for a node type.
  pub fn get(&self, node_type: &str) -> Option<Arc<dyn NodeHandler>> {
    self.handlers.get(node_type).cloned()
  }

  /// Registered node type keys.
  pub fn node_types(&self) -> impl Iterator<Item = &str> {
    self.handlers.keys().map(String::as_str)
  }
}

impl fmt::Debug for HandlerRegistry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut node_types: Vec<&str> = self.node_types().collect();
    node_types.sort_unstable();
    f.debug_struct("HandlerRegistry")
      .field("node_types", &node_types)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Echo;

  #[async_trait]
  impl NodeHandler for Echo {
    async fn execute(&self, node: &Node, _upstream: UpstreamInput) -> Result<String, HandlerError> {
      Ok(node.id.clone())
    }
  }

  #[test]
  fn duplicate_registration_is_rejected() {
    let mut registry = HandlerRegistry::new();
    registry.register("echo", Arc::new(Echo)).unwrap();

    let err = registry.register("echo", Arc::new(Echo)).unwrap_err();
    assert_eq!(err, RegistryError::DuplicateHandler("echo".to_string()));
  }

  #[test]
  fn upstream_input_collapses_by_arity() {
    assert_eq!(UpstreamInput::from_outputs(vec![]), UpstreamInput::None);
    assert_eq!(
      UpstreamInput::from_outputs(vec!["x".into()]),
      UpstreamInput::Single("x".into())
    );
    assert_eq!(
      UpstreamInput::from_outputs(vec!["x".into(), "y".into()]),
      UpstreamInput::Many(vec!["x".into(), "y".into()])
    );
  }

  #[test]
  fn upstream_input_preserves_order() {
    let upstream = UpstreamInput::from_outputs(vec!["x".into(), "y".into(), "z".into()]);
    assert_eq!(upstream.as_slice(), ["x", "y", "z"]);
    assert_eq!(upstream.first(), Some("x"));
  }
}
