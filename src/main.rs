use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use vortex_engine::Engine;
use vortex_graph::Workflow;
use vortex_handlers::{HandlerConfig, builtin_registry};

/// Vortex - a graph workflow runner for AI pipelines
#[derive(Parser)]
#[command(name = "vortex")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.vortex)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Execute a workflow file
  Run {
    /// Path to the workflow file (JSON)
    workflow_file: PathBuf,
  },

  /// Check a workflow file's structure without executing it
  Validate {
    /// Path to the workflow file (JSON)
    workflow_file: PathBuf,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let data_dir = cli.data_dir.unwrap_or_else(|| {
    dirs::home_dir()
      .expect("could not determine home directory")
      .join(".vortex")
  });

  match cli.command {
    Some(Commands::Run { workflow_file }) => run_workflow(workflow_file, data_dir)?,
    Some(Commands::Validate { workflow_file }) => validate_workflow(workflow_file)?,
    None => println!("vortex - use --help to see available commands"),
  }

  Ok(())
}

fn load_workflow(workflow_file: &PathBuf) -> Result<Workflow> {
  let content = std::fs::read_to_string(workflow_file)
    .with_context(|| format!("failed to read workflow file: {}", workflow_file.display()))?;
  serde_json::from_str(&content)
    .with_context(|| format!("failed to parse workflow file: {}", workflow_file.display()))
}

fn run_workflow(workflow_file: PathBuf, data_dir: PathBuf) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(run_workflow_async(workflow_file, data_dir))
}

async fn run_workflow_async(workflow_file: PathBuf, data_dir: PathBuf) -> Result<()> {
  let workflow = load_workflow(&workflow_file)?;
  eprintln!("Loaded workflow: {}", workflow.name);

  // The engine trusts node data as given; flag editor-rejected nodes so a
  // surprising result is traceable.
  for node in &workflow.nodes {
    if !node.data.is_valid() {
      warn!(node_id = %node.id, "node editor marked this node invalid; executing as given");
    }
  }

  let config = HandlerConfig::from_env(data_dir.join("artifacts"));
  let registry = builtin_registry(&config).context("failed to build handler registry")?;
  let engine = Engine::new(registry);

  let cancel = CancellationToken::new();
  let outcome = engine
    .execute(&workflow, cancel)
    .await
    .context("workflow execution failed")?;

  eprintln!(
    "Execution {} completed: {} nodes succeeded, {} failed",
    outcome.execution_id,
    outcome.executed.len(),
    outcome.errors.len()
  );
  for failure in &outcome.errors {
    eprintln!("node {} failed: {}", failure.node_id, failure.message);
  }
  for result in outcome.results.values() {
    if let Some(path) = result.artifact_path() {
      eprintln!("node {} produced an artifact at {}", result.node_id, path);
    }
  }

  println!("{}", serde_json::to_string_pretty(&outcome)?);
  Ok(())
}

fn validate_workflow(workflow_file: PathBuf) -> Result<()> {
  let workflow = load_workflow(&workflow_file)?;

  if workflow.nodes.is_empty() {
    anyhow::bail!("workflow has no nodes");
  }
  let graph = workflow.graph().context("workflow graph is invalid")?;
  if graph.entry_points().is_empty() {
    anyhow::bail!("workflow has no entry nodes (every node has an incoming edge)");
  }

  println!(
    "workflow '{}' is valid: {} nodes, {} edges, entry nodes: {}",
    workflow.name,
    workflow.nodes.len(),
    workflow.edges.len(),
    graph.entry_points().join(", ")
  );
  Ok(())
}
