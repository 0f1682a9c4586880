//! `combineText` node handler.

use async_trait::async_trait;
use vortex_engine::{HandlerError, NodeHandler, UpstreamInput};
use vortex_graph::Node;

use crate::text::pretty_json_or_raw;

/// Fallback output when a combine node has nothing to merge.
const NO_INPUT_FALLBACK: &str = "No input data provided to the combine node.";

/// Concatenates upstream outputs into delimited `--- Source N ---`
/// sections, in edge declaration order.
#[derive(Debug, Clone, Default)]
pub struct CombineTextHandler;

#[async_trait]
impl NodeHandler for CombineTextHandler {
  async fn execute(&self, _node: &Node, upstream: UpstreamInput) -> Result<String, HandlerError> {
    if upstream.is_none() {
      return Ok(NO_INPUT_FALLBACK.to_string());
    }

    let mut combined = String::new();
    for (i, output) in upstream.as_slice().iter().enumerate() {
      combined.push_str(&format!("--- Source {} ---\n", i + 1));
      combined.push_str(&pretty_json_or_raw(output));
      combined.push_str("\n\n");
    }
    Ok(combined)
  }
}
