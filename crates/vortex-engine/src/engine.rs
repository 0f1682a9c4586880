//! Workflow execution engine.
//!
//! One call to [`Engine::execute`] runs one workflow snapshot to
//! completion: validate the graph, walk it in dependency order, dispatch
//! each node to its registered handler with the gathered upstream outputs,
//! and fold results and failures into a [`RunOutcome`].
//!
//! Scheduling is a ready-wave loop: a node becomes ready once every
//! upstream node has been attempted, so a fan-in node can never observe a
//! half-finished set of predecessors. Nodes inside one wave execute
//! concurrently; their outputs are folded back on the engine task, which
//! keeps aggregation race-free and makes the at-most-one-attempt invariant
//! a property of a single `attempted` set rather than of traversal order.

use std::collections::HashSet;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use vortex_graph::{Graph, Node, Workflow};

use crate::error::EngineError;
use crate::events::{ExecutionEvent, ExecutionNotifier, NoopNotifier};
use crate::outcome::{NodeFailure, NodeResult, RunOutcome};
use crate::registry::{HandlerRegistry, UpstreamInput};

/// The workflow execution engine.
///
/// Holds the handler registry; each call to [`Engine::execute`] performs
/// one independent run over an immutable workflow snapshot.
pub struct Engine {
  registry: Arc<HandlerRegistry>,
  notifier: Arc<dyn ExecutionNotifier>,
}

impl Engine {
  pub fn new(registry: HandlerRegistry) -> Self {
    Self {
      registry: Arc::new(registry),
      notifier: Arc::new(NoopNotifier),
    }
  }

  /// Attach a notifier that receives execution events.
  pub fn with_notifier(mut self, notifier: Arc<dyn ExecutionNotifier>) -> Self {
    self.notifier = notifier;
    self
  }

  /// Execute a workflow.
  ///
  /// Structural conditions (empty workflow, invalid edges, no entry nodes)
  /// and cancellation return an error; zero handlers have run when the
  /// pre-run checks fire. Handler failures and unknown node types are
  /// recorded on the outcome and never abort the run.
  pub async fn execute(
    &self,
    workflow: &Workflow,
    cancel: CancellationToken,
  ) -> Result<RunOutcome, EngineError> {
    if workflow.nodes.is_empty() {
      return Err(EngineError::EmptyWorkflow);
    }

    let graph = workflow.graph()?;
    if graph.entry_points().is_empty() {
      return Err(EngineError::NoEntryPoints);
    }

    let execution_id = uuid::Uuid::new_v4().to_string();
    info!(
      execution_id = %execution_id,
      workflow_id = %workflow.workflow_id,
      nodes = workflow.nodes.len(),
      entry_points = ?graph.entry_points(),
      "workflow started"
    );
    self.notifier.notify(ExecutionEvent::WorkflowStarted {
      execution_id: execution_id.clone(),
      workflow_id: workflow.workflow_id.clone(),
    });

    let mut outcome = RunOutcome::new(execution_id.clone());
    // Successes and failures both count as attempted: a failed node is
    // never re-visited, even when reachable along another path.
    let mut attempted: HashSet<String> = HashSet::new();

    loop {
      if cancel.is_cancelled() {
        warn!(execution_id = %execution_id, "workflow cancelled");
        self.notifier.notify(ExecutionEvent::WorkflowFailed {
          execution_id,
          error: EngineError::Cancelled.to_string(),
        });
        return Err(EngineError::Cancelled);
      }

      let ready = find_ready_nodes(workflow, &graph, &attempted);
      if ready.is_empty() {
        break;
      }

      debug!(
        execution_id = %execution_id,
        ready = ?ready.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
        "executing ready wave"
      );

      // The wave runs concurrently; outputs are folded back below, on this
      // task, before the next wave is computed.
      let invocations = ready
        .iter()
        .map(|node| self.run_node(node, &graph, &outcome, &execution_id));
      let wave_results = futures::future::join_all(invocations).await;

      for (node, result) in ready.iter().zip(wave_results) {
        attempted.insert(node.id.clone());
        match result {
          Ok(output) => {
            outcome.executed.insert(node.id.clone());
            outcome.results.insert(
              node.id.clone(),
              NodeResult {
                node_id: node.id.clone(),
                node_type: node.node_type.clone(),
                output,
                data: node.data.clone(),
              },
            );
          }
          Err(failure) => outcome.errors.push(failure),
        }
      }
    }

    // Anything never attempted sits on a cycle that dependency order cannot
    // break. Surface each node instead of looping forever; completed
    // branches keep their results.
    for node in &workflow.nodes {
      if !attempted.contains(&node.id) {
        warn!(execution_id = %execution_id, node_id = %node.id, "node skipped: dependency cycle");
        let failure = NodeFailure {
          node_id: node.id.clone(),
          message: "skipped: node is part of an unresolvable dependency cycle".to_string(),
        };
        self.notifier.notify(ExecutionEvent::NodeFailed {
          execution_id: execution_id.clone(),
          node_id: node.id.clone(),
          error: failure.message.clone(),
        });
        outcome.errors.push(failure);
      }
    }

    info!(
      execution_id = %execution_id,
      executed = outcome.executed.len(),
      failed = outcome.errors.len(),
      "workflow completed"
    );
    self
      .notifier
      .notify(ExecutionEvent::WorkflowCompleted { execution_id });

    Ok(outcome)
  }

  /// Execute a single ready node: resolve its handler, gather upstream
  /// outputs, invoke.
  async fn run_node(
    &self,
    node: &Node,
    graph: &Graph,
    outcome: &RunOutcome,
    execution_id: &str,
  ) -> Result<String, NodeFailure> {
    let Some(handler) = self.registry.get(&node.node_type) else {
      error!(
        execution_id = %execution_id,
        node_id = %node.id,
        node_type = %node.node_type,
        "no handler registered for node type"
      );
      let failure = NodeFailure {
        node_id: node.id.clone(),
        message: format!("no handler registered for node type: {}", node.node_type),
      };
      self.notifier.notify(ExecutionEvent::NodeFailed {
        execution_id: execution_id.to_string(),
        node_id: node.id.clone(),
        error: failure.message.clone(),
      });
      return Err(failure);
    };

    // Upstream outputs in edge declaration order. Predecessors that failed
    // or were unresolvable contribute nothing; the handler applies its own
    // absent-input fallback.
    let outputs: Vec<String> = graph
      .upstream(&node.id)
      .iter()
      .filter_map(|up| outcome.results.get(up).map(|r| r.output.clone()))
      .collect();
    let upstream = UpstreamInput::from_outputs(outputs);

    debug!(
      execution_id = %execution_id,
      node_id = %node.id,
      node_type = %node.node_type,
      "node started"
    );
    self.notifier.notify(ExecutionEvent::NodeStarted {
      execution_id: execution_id.to_string(),
      node_id: node.id.clone(),
    });

    match handler.execute(node, upstream).await {
      Ok(output) => {
        debug!(execution_id = %execution_id, node_id = %node.id, "node completed");
        self.notifier.notify(ExecutionEvent::NodeCompleted {
          execution_id: execution_id.to_string(),
          node_id: node.id.clone(),
          output: output.clone(),
        });
        Ok(output)
      }
      Err(e) => {
        error!(execution_id = %execution_id, node_id = %node.id, error = %e, "node failed");
        self.notifier.notify(ExecutionEvent::NodeFailed {
          execution_id: execution_id.to_string(),
          node_id: node.id.clone(),
          error: e.to_string(),
        });
        Err(NodeFailure {
          node_id: node.id.clone(),
          message: e.to_string(),
        })
      }
    }
  }
}

/// Nodes not yet attempted whose every upstream node has been attempted,
/// in node declaration order.
fn find_ready_nodes<'a>(
  workflow: &'a Workflow,
  graph: &Graph,
  attempted: &HashSet<String>,
) -> Vec<&'a Node> {
  workflow
    .nodes
    .iter()
    .filter(|n| !attempted.contains(&n.id))
    .filter(|n| graph.upstream(&n.id).iter().all(|up| attempted.contains(up)))
    .collect()
}
