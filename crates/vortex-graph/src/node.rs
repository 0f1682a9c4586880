use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Handler-specific configuration carried by a node.
///
/// Opaque to the engine apart from the optional `isValid` flag written by
/// node editors; handlers read whichever fields they need.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeData(HashMap<String, serde_json::Value>);

impl NodeData {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
    self.0.get(key)
  }

  /// String field access; non-string values yield `None`.
  pub fn get_str(&self, key: &str) -> Option<&str> {
    self.0.get(key).and_then(|v| v.as_str())
  }

  pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
    self.0.insert(key.into(), value);
  }

  /// Editor-provided validity flag. Absent means valid.
  pub fn is_valid(&self) -> bool {
    self
      .0
      .get("isValid")
      .and_then(|v| v.as_bool())
      .unwrap_or(true)
  }
}

/// A unit of work in the workflow graph.
///
/// `node_type` is the handler key the engine dispatches on; `data` is the
/// configuration payload produced by the node's editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
  pub id: String,
  #[serde(rename = "type")]
  pub node_type: String,
  #[serde(default)]
  pub data: NodeData,
}

impl Node {
  pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      node_type: node_type.into(),
      data: NodeData::new(),
    }
  }

  /// Builder-style helper for setting a data field.
  pub fn with_data(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
    self.data.insert(key, value);
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn node_deserializes_with_type_key_and_default_data() {
    let node: Node = serde_json::from_str(r#"{"id": "ask-1", "type": "askAI"}"#).unwrap();
    assert_eq!(node.id, "ask-1");
    assert_eq!(node.node_type, "askAI");
    assert_eq!(node.data, NodeData::new());
  }

  #[test]
  fn is_valid_defaults_to_true() {
    let node = Node::new("n", "askAI");
    assert!(node.data.is_valid());

    let node = node.with_data("isValid", json!(false));
    assert!(!node.data.is_valid());
  }

  #[test]
  fn get_str_ignores_non_string_values() {
    let node = Node::new("n", "askAI")
      .with_data("prompt", json!("hi"))
      .with_data("weights", json!({"teamwork": 3}));

    assert_eq!(node.data.get_str("prompt"), Some("hi"));
    assert_eq!(node.data.get_str("weights"), None);
    assert!(node.data.get("weights").is_some());
  }
}
