use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
  #[error("duplicate node id: {0}")]
  DuplicateNode(String),

  #[error("edge '{edge_id}' references unknown node: source={source}, target={target}")]
  InvalidEdge {
    edge_id: String,
    source: String,
    target: String,
  },
}
