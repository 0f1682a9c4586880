//! Per-run result accumulators.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use vortex_graph::NodeData;

/// Output prefix document handlers use to report a stored artifact.
const ARTIFACT_PREFIX: &str = "PDF generated successfully at ";

/// Result of a single successfully executed node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeResult {
  pub node_id: String,
  #[serde(rename = "type")]
  pub node_type: String,
  pub output: String,
  pub data: NodeData,
}

impl NodeResult {
  /// Path of the artifact this node produced, if its output follows the
  /// document handlers' reporting convention.
  ///
  /// Retrieving the artifact is the caller's job; the engine stores the
  /// output string verbatim.
  pub fn artifact_path(&self) -> Option<&str> {
    self.output.strip_prefix(ARTIFACT_PREFIX).map(str::trim)
  }
}

/// A per-node failure recorded during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFailure {
  pub node_id: String,
  pub message: String,
}

/// Accumulated outcome of one workflow run.
///
/// `executed` contains only nodes that completed successfully; failed
/// nodes appear in `errors` and are never retried within the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunOutcome {
  pub execution_id: String,
  /// Results keyed by node id, one entry per successfully executed node.
  pub results: HashMap<String, NodeResult>,
  /// Per-node failures, in the order they were recorded.
  pub errors: Vec<NodeFailure>,
  /// Ids of nodes that executed successfully.
  pub executed: HashSet<String>,
}

impl RunOutcome {
  pub(crate) fn new(execution_id: String) -> Self {
    Self {
      execution_id,
      ..Default::default()
    }
  }

  pub fn get(&self, node_id: &str) -> Option<&NodeResult> {
    self.results.get(node_id)
  }

  pub fn has_errors(&self) -> bool {
    !self.errors.is_empty()
  }
}
