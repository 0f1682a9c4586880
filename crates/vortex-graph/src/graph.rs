use std::collections::{HashMap, HashSet};

use crate::edge::Edge;
use crate::error::GraphError;
use crate::node::Node;

/// Graph structure for traversal and analysis.
///
/// Built once per run from the workflow snapshot; all queries are pure and
/// borrow internal lists, so repeated calls return identical results.
#[derive(Debug, Clone)]
pub struct Graph {
  /// Adjacency list: node id -> downstream node ids, in edge declaration order.
  adjacency: HashMap<String, Vec<String>>,
  /// Reverse adjacency: node id -> upstream node ids, in edge declaration order.
  reverse_adjacency: HashMap<String, Vec<String>>,
  /// Nodes with no incoming edges, in node declaration order.
  entry_points: Vec<String>,
  /// Nodes with multiple incoming edges (fan-in points).
  join_points: HashSet<String>,
}

impl Graph {
  /// Build a graph from nodes and edges.
  ///
  /// Fails if a node id repeats or an edge references a node that does not
  /// exist.
  pub fn new(nodes: &[Node], edges: &[Edge]) -> Result<Self, GraphError> {
    let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
    let mut reverse_adjacency: HashMap<String, Vec<String>> = HashMap::new();

    for node in nodes {
      if adjacency.contains_key(&node.id) {
        return Err(GraphError::DuplicateNode(node.id.clone()));
      }
      adjacency.insert(node.id.clone(), Vec::new());
      reverse_adjacency.insert(node.id.clone(), Vec::new());
    }

    for edge in edges {
      if !adjacency.contains_key(&edge.source) || !adjacency.contains_key(&edge.target) {
        return Err(GraphError::InvalidEdge {
          edge_id: edge.id.clone(),
          source: edge.source.clone(),
          target: edge.target.clone(),
        });
      }
      adjacency
        .entry(edge.source.clone())
        .or_default()
        .push(edge.target.clone());
      reverse_adjacency
        .entry(edge.target.clone())
        .or_default()
        .push(edge.source.clone());
    }

    let entry_points: Vec<String> = nodes
      .iter()
      .filter(|n| reverse_adjacency.get(&n.id).is_none_or(|v| v.is_empty()))
      .map(|n| n.id.clone())
      .collect();

    let join_points: HashSet<String> = reverse_adjacency
      .iter()
      .filter(|(_, incoming)| incoming.len() > 1)
      .map(|(id, _)| id.clone())
      .collect();

    Ok(Self {
      adjacency,
      reverse_adjacency,
      entry_points,
      join_points,
    })
  }

  /// Entry points (nodes with no incoming edges), in node declaration order.
  pub fn entry_points(&self) -> &[String] {
    &self.entry_points
  }

  /// Downstream nodes for a given node, in edge declaration order.
  pub fn downstream(&self, node_id: &str) -> &[String] {
    self
      .adjacency
      .get(node_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Upstream nodes for a given node, in edge declaration order.
  pub fn upstream(&self, node_id: &str) -> &[String] {
    self
      .reverse_adjacency
      .get(node_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Whether a node has multiple incoming edges.
  pub fn is_join_point(&self, node_id: &str) -> bool {
    self.join_points.contains(node_id)
  }

  /// All fan-in points.
  pub fn join_points(&self) -> &HashSet<String> {
    &self.join_points
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn node(id: &str) -> Node {
    Node::new(id, "test")
  }

  fn edge(source: &str, target: &str) -> Edge {
    Edge::new(format!("e-{source}-{target}"), source, target)
  }

  #[test]
  fn entry_points_follow_node_declaration_order() {
    let nodes = vec![node("c"), node("a"), node("b")];
    let edges = vec![edge("a", "b")];

    let graph = Graph::new(&nodes, &edges).unwrap();
    assert_eq!(graph.entry_points(), ["c", "a"]);
  }

  #[test]
  fn upstream_follows_edge_declaration_order() {
    let nodes = vec![node("a"), node("b"), node("c")];
    // b's edge declared before a's; the fan-in order must reflect that.
    let edges = vec![edge("b", "c"), edge("a", "c")];

    let graph = Graph::new(&nodes, &edges).unwrap();
    assert_eq!(graph.upstream("c"), ["b", "a"]);
    assert_eq!(graph.downstream("a"), ["c"]);
    assert!(graph.is_join_point("c"));
    assert!(!graph.is_join_point("a"));
  }

  #[test]
  fn queries_are_pure() {
    let nodes = vec![node("a"), node("b")];
    let edges = vec![edge("a", "b")];

    let graph = Graph::new(&nodes, &edges).unwrap();
    assert_eq!(graph.entry_points(), graph.entry_points());
    assert_eq!(graph.upstream("b"), graph.upstream("b"));
    assert_eq!(graph.downstream("a"), graph.downstream("a"));
  }

  #[test]
  fn duplicate_node_id_is_rejected() {
    let nodes = vec![node("a"), node("a")];
    let err = Graph::new(&nodes, &[]).unwrap_err();
    assert_eq!(err, GraphError::DuplicateNode("a".to_string()));
  }

  #[test]
  fn dangling_edge_is_rejected() {
    let nodes = vec![node("a")];
    let edges = vec![edge("a", "ghost")];
    let err = Graph::new(&nodes, &edges).unwrap_err();
    assert!(matches!(err, GraphError::InvalidEdge { .. }));
  }

  #[test]
  fn all_node_cycle_has_no_entry_points() {
    let nodes = vec![node("a"), node("b")];
    let edges = vec![edge("a", "b"), edge("b", "a")];

    let graph = Graph::new(&nodes, &edges).unwrap();
    assert!(graph.entry_points().is_empty());
  }

  #[test]
  fn unknown_node_queries_return_empty() {
    let graph = Graph::new(&[node("a")], &[]).unwrap();
    assert!(graph.upstream("ghost").is_empty());
    assert!(graph.downstream("ghost").is_empty());
  }
}
