use serde::{Deserialize, Serialize};

/// A directed dependency between two nodes.
///
/// An edge is both topology and data channel: the source node's output is
/// made available to the target node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
  pub id: String,
  pub source: String,
  pub target: String,
}

impl Edge {
  pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      source: source.into(),
      target: target.into(),
    }
  }
}
