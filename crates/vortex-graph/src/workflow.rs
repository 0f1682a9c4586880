use serde::{Deserialize, Serialize};

use crate::edge::Edge;
use crate::error::GraphError;
use crate::graph::Graph;
use crate::node::Node;

/// A workflow snapshot ready for execution.
///
/// Node and edge declaration order is preserved: entry nodes are visited in
/// node order, and fan-in inputs arrive in edge order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
  /// Optional identity; editors that submit a bare `{nodes, edges}` pair
  /// get empty strings.
  #[serde(default)]
  pub workflow_id: String,
  #[serde(default)]
  pub name: String,
  pub nodes: Vec<Node>,
  pub edges: Vec<Edge>,
}

impl Workflow {
  /// Build the graph structure for traversal.
  pub fn graph(&self) -> Result<Graph, GraphError> {
    Graph::new(&self.nodes, &self.edges)
  }

  /// Get a node by id.
  pub fn get_node(&self, node_id: &str) -> Option<&Node> {
    self.nodes.iter().find(|n| n.id == node_id)
  }
}
