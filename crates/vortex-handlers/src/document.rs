//! `pdfGenerator` node handler.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use vortex_engine::{HandlerError, NodeHandler, UpstreamInput};
use vortex_graph::Node;

use crate::artifact::ArtifactStore;

const NO_CONTENT_FALLBACK: &str = "No content provided.";
const DEFAULT_TITLE: &str = "Candidate Evaluation Report";

/// Renders upstream content into a stored document and reports its path.
///
/// The output string follows the `PDF generated successfully at {path}`
/// convention that callers match to offer the artifact for download; the
/// engine stores it verbatim. Byte-level document formatting is the
/// store/renderer's concern, not the workflow's.
pub struct DocumentHandler {
  store: Arc<dyn ArtifactStore>,
}

impl DocumentHandler {
  pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
    Self { store }
  }
}

#[async_trait]
impl NodeHandler for DocumentHandler {
  async fn execute(&self, node: &Node, upstream: UpstreamInput) -> Result<String, HandlerError> {
    let content = if upstream.is_none() {
      node
        .data
        .get_str("content")
        .unwrap_or(NO_CONTENT_FALLBACK)
        .to_string()
    } else {
      upstream.as_slice().join("\n\n")
    };

    let title = node.data.get_str("title").unwrap_or(DEFAULT_TITLE);
    let document = render_document(title, &content);

    let file_name = format!("generated_{}.pdf", uuid::Uuid::new_v4().simple());
    let path = self
      .store
      .put(&file_name, document.as_bytes())
      .await
      .map_err(|e| HandlerError::new(format!("failed to store document: {e}")))?;

    info!(node_id = %node.id, path = %path.display(), "document stored");
    Ok(format!("PDF generated successfully at {}", path.display()))
  }
}

/// Flatten the lightweight markup upstream AI nodes emit (headings, bold
/// lines, bullets) into a plain text layout under a title banner.
fn render_document(title: &str, content: &str) -> String {
  let mut doc = String::new();
  doc.push_str(title);
  doc.push('\n');
  doc.push_str(&"=".repeat(title.chars().count()));
  doc.push_str("\n\n");

  for line in content.lines() {
    let line = line.trim();
    if line.is_empty() {
      doc.push('\n');
      continue;
    }

    // Chart placeholders have no text rendition.
    if line.starts_with("![") {
      continue;
    }

    if let Some(heading) = line.strip_prefix("####") {
      doc.push_str(heading.trim());
      doc.push('\n');
      continue;
    }
    if let Some(heading) = line.strip_prefix("###") {
      doc.push_str(&heading.trim().to_uppercase());
      doc.push('\n');
      continue;
    }
    if let Some(bullet) = line.strip_prefix("- ") {
      doc.push_str("  • ");
      doc.push_str(bullet);
      doc.push('\n');
      continue;
    }

    // Bold/italic wrappers render as plain emphasis-free text.
    let stripped = line.trim_matches('*').trim();
    doc.push_str(stripped);
    doc.push('\n');
  }

  doc
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::artifact::FsArtifactStore;
  use serde_json::json;

  #[test]
  fn render_flattens_markup() {
    let doc = render_document(
      "Report",
      "### Summary\n#### Strengths\n- curious\n**Evidence:**\nplain line",
    );

    assert!(doc.starts_with("Report\n======\n"));
    assert!(doc.contains("SUMMARY\n"));
    assert!(doc.contains("Strengths\n"));
    assert!(doc.contains("  • curious\n"));
    assert!(doc.contains("Evidence:\n"));
    assert!(doc.contains("plain line\n"));
  }

  #[test]
  fn render_skips_chart_placeholders() {
    let doc = render_document("Report", "![Radar Chart](chart.png)\ntext");
    assert!(!doc.contains("Radar"));
    assert!(doc.contains("text"));
  }

  #[tokio::test]
  async fn document_is_stored_and_path_reported() {
    let temp_dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FsArtifactStore::new(temp_dir.path()));
    let handler = DocumentHandler::new(store);

    let node = Node::new("pdf-1", "pdfGenerator").with_data("title", json!("Weekly Report"));
    let upstream = UpstreamInput::Single("### Findings\n- all good".to_string());

    let output = handler.execute(&node, upstream).await.unwrap();

    let path = output
      .strip_prefix("PDF generated successfully at ")
      .unwrap();
    let stored = std::fs::read_to_string(path).unwrap();
    assert!(stored.starts_with("Weekly Report\n"));
    assert!(stored.contains("FINDINGS"));
  }

  #[tokio::test]
  async fn missing_input_falls_back_to_content_field() {
    let temp_dir = tempfile::tempdir().unwrap();
    let handler = DocumentHandler::new(Arc::new(FsArtifactStore::new(temp_dir.path())));

    let node = Node::new("pdf-1", "pdfGenerator").with_data("content", json!("inline content"));
    let output = handler.execute(&node, UpstreamInput::None).await.unwrap();

    let path = output
      .strip_prefix("PDF generated successfully at ")
      .unwrap();
    assert!(std::fs::read_to_string(path).unwrap().contains("inline content"));
  }
}
