//! End-to-end runs over the built-in handlers with the offline model.

use serde_json::json;
use tokio_util::sync::CancellationToken;

use vortex_engine::Engine;
use vortex_graph::{Edge, Node, Workflow};
use vortex_handlers::{HandlerConfig, builtin_registry};

fn offline_engine(artifacts_dir: &std::path::Path) -> Engine {
  // No credentials: askAI resolves to the echo model, nothing touches the
  // network.
  let config = HandlerConfig::new(artifacts_dir);
  Engine::new(builtin_registry(&config).unwrap())
}

fn workflow(nodes: Vec<Node>, edges: Vec<Edge>) -> Workflow {
  Workflow {
    workflow_id: "wf-scenario".to_string(),
    name: "Scenario".to_string(),
    nodes,
    edges,
  }
}

fn edge(source: &str, target: &str) -> Edge {
  Edge::new(format!("e-{source}-{target}"), source, target)
}

#[tokio::test]
async fn ask_ai_feeds_combine_text() {
  let temp_dir = tempfile::tempdir().unwrap();
  let engine = offline_engine(temp_dir.path());

  let wf = workflow(
    vec![
      Node::new("a", "askAI").with_data("prompt", json!("hi")),
      Node::new("b", "combineText"),
    ],
    vec![edge("a", "b")],
  );

  let outcome = engine.execute(&wf, CancellationToken::new()).await.unwrap();

  assert!(outcome.errors.is_empty());
  assert!(outcome.executed.contains("a") && outcome.executed.contains("b"));
  assert_eq!(outcome.get("a").unwrap().output, "AI Response: hi");

  let combined = &outcome.get("b").unwrap().output;
  assert!(combined.contains("--- Source 1 ---"));
  assert!(combined.contains("AI Response: hi"));
  assert!(!combined.contains("Source 2"));
}

#[tokio::test]
async fn unknown_type_upstream_of_combine_text() {
  let temp_dir = tempfile::tempdir().unwrap();
  let engine = offline_engine(temp_dir.path());

  let wf = workflow(
    vec![Node::new("x", "doesNotExist"), Node::new("y", "combineText")],
    vec![edge("x", "y")],
  );

  let outcome = engine.execute(&wf, CancellationToken::new()).await.unwrap();

  assert_eq!(outcome.errors.len(), 1);
  assert_eq!(outcome.errors[0].node_id, "x");
  assert!(outcome.executed.contains("y"));
  assert!(!outcome.executed.contains("x"));
  assert!(
    outcome
      .get("y")
      .unwrap()
      .output
      .contains("No input data provided")
  );
}

#[tokio::test]
async fn culture_fit_through_ask_ai_to_document() {
  let temp_dir = tempfile::tempdir().unwrap();
  let engine = offline_engine(temp_dir.path());

  let wf = workflow(
    vec![
      Node::new("fit", "cultureFit")
        .with_data("companyValues", json!("Candor and craft"))
        .with_data("weights", json!({"teamwork": 8})),
      Node::new("ask", "askAI").with_data("prompt", json!("Evaluate the candidate.")),
      Node::new("pdf", "pdfGenerator").with_data("title", json!("Evaluation")),
    ],
    vec![edge("fit", "ask"), edge("ask", "pdf")],
  );

  let outcome = engine.execute(&wf, CancellationToken::new()).await.unwrap();
  assert!(outcome.errors.is_empty(), "errors: {:?}", outcome.errors);

  // The echo model folds the culture-fit block into its reply.
  let ai_output = &outcome.get("ask").unwrap().output;
  assert!(ai_output.contains("Company Values: Candor and craft"));
  assert!(ai_output.contains("teamwork: 8"));
  assert!(ai_output.contains("Evaluate the candidate."));

  // The document node reports a retrievable artifact.
  let pdf = outcome.get("pdf").unwrap();
  let path = pdf.artifact_path().expect("document output should carry a path");
  let stored = std::fs::read_to_string(path).unwrap();
  assert!(stored.starts_with("Evaluation\n"));
  assert!(stored.contains("Company Values: Candor and craft"));
}

#[tokio::test]
async fn invalid_culture_fit_node_fails_without_stopping_the_run() {
  let temp_dir = tempfile::tempdir().unwrap();
  let engine = offline_engine(temp_dir.path());

  let wf = workflow(
    vec![
      Node::new("fit", "cultureFit"), // no companyValues: the handler rejects it
      Node::new("ask", "askAI").with_data("prompt", json!("hello")),
      Node::new("combine", "combineText"),
    ],
    vec![edge("fit", "combine"), edge("ask", "combine")],
  );

  let outcome = engine.execute(&wf, CancellationToken::new()).await.unwrap();

  assert_eq!(outcome.errors.len(), 1);
  assert_eq!(outcome.errors[0].node_id, "fit");

  // combine still ran, seeing only the surviving branch.
  let combined = &outcome.get("combine").unwrap().output;
  assert!(combined.contains("--- Source 1 ---"));
  assert!(combined.contains("AI Response: hello"));
  assert!(!combined.contains("Source 2"));
}
