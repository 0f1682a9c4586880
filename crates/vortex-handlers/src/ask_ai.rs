//! `askAI` node handler.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use vortex_engine::{HandlerError, NodeHandler, UpstreamInput};
use vortex_graph::Node;

use crate::model::ModelClient;
use crate::text::pretty_json_or_raw;

/// Sends the node's prompt, along with any upstream outputs, to the model
/// backend and returns the completion.
pub struct AskAiHandler {
  client: Arc<dyn ModelClient>,
}

impl AskAiHandler {
  pub fn new(client: Arc<dyn ModelClient>) -> Self {
    Self { client }
  }
}

#[async_trait]
impl NodeHandler for AskAiHandler {
  async fn execute(&self, node: &Node, upstream: UpstreamInput) -> Result<String, HandlerError> {
    let prompt = node.data.get_str("prompt").unwrap_or_default();
    let context = node.data.get_str("context").unwrap_or_default();
    let final_prompt = build_prompt(context, &upstream, prompt);

    debug!(node_id = %node.id, "dispatching prompt to model backend");
    self
      .client
      .generate(&final_prompt)
      .await
      .map_err(|e| HandlerError::new(e.to_string()))
  }
}

/// Assemble the final prompt: context, then upstream outputs (JSON
/// pretty-printed when parseable), then the user prompt. An entry node
/// with no context sends its prompt unadorned.
fn build_prompt(context: &str, upstream: &UpstreamInput, prompt: &str) -> String {
  let mut combined = String::new();
  for output in upstream.as_slice() {
    combined.push_str(&pretty_json_or_raw(output));
    combined.push_str("\n\n");
  }

  if context.is_empty() && combined.is_empty() {
    return prompt.to_string();
  }
  format!("{context}\n{combined}\n{prompt}")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn entry_node_prompt_passes_through() {
    assert_eq!(build_prompt("", &UpstreamInput::None, "hi"), "hi");
  }

  #[test]
  fn upstream_outputs_sit_between_context_and_prompt() {
    let upstream = UpstreamInput::Single("profile text".to_string());
    let prompt = build_prompt("You are a recruiter.", &upstream, "Evaluate the candidate.");

    let profile = prompt.find("profile text").unwrap();
    assert!(prompt.find("You are a recruiter.").unwrap() < profile);
    assert!(profile < prompt.find("Evaluate the candidate.").unwrap());
  }

  #[test]
  fn json_upstream_is_pretty_printed_into_the_prompt() {
    let upstream = UpstreamInput::Single(r#"{"name":"Ada"}"#.to_string());
    let prompt = build_prompt("", &upstream, "Summarize.");
    assert!(prompt.contains("\"name\": \"Ada\""));
  }
}
