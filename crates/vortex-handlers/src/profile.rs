//! `linkedIn` node handler.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::info;
use vortex_engine::{HandlerError, NodeHandler, UpstreamInput};
use vortex_graph::Node;

const PROFILE_URL_PREFIX: &str = "https://www.linkedin.com/in/";

/// Fetches a profile page with the configured session cookie and returns
/// a JSON envelope of the page text.
///
/// Field-level extraction from the page markup is a collaborator concern;
/// downstream AI nodes consume the flattened text.
pub struct ProfileHandler {
  http: Client,
  session_cookie: Option<String>,
}

impl ProfileHandler {
  pub fn new(session_cookie: Option<String>) -> Self {
    Self {
      http: Client::new(),
      session_cookie,
    }
  }
}

#[async_trait]
impl NodeHandler for ProfileHandler {
  async fn execute(&self, node: &Node, _upstream: UpstreamInput) -> Result<String, HandlerError> {
    let Some(cookie) = &self.session_cookie else {
      return Err(HandlerError::new(
        "LI_AT session cookie is not configured; cannot fetch profiles",
      ));
    };

    let profile_url = validate_profile_url(node.data.get_str("profileUrl"))?;

    info!(node_id = %node.id, url = %profile_url, "fetching profile");
    let response = self
      .http
      .get(profile_url)
      .header("Cookie", format!("li_at={cookie}"))
      .send()
      .await
      .map_err(|e| HandlerError::new(format!("profile fetch failed: {e}")))?;

    let status = response.status().as_u16();
    let body = response
      .text()
      .await
      .map_err(|e| HandlerError::new(format!("profile fetch failed: {e}")))?;

    let envelope = json!({
      "url": profile_url,
      "status": status,
      "page_text": extract_text(&body),
    });
    serde_json::to_string_pretty(&envelope)
      .map_err(|e| HandlerError::new(format!("failed to encode profile data: {e}")))
  }
}

fn validate_profile_url(url: Option<&str>) -> Result<&str, HandlerError> {
  let url = url.ok_or_else(|| HandlerError::new("no profile URL provided"))?;
  if !url.starts_with(PROFILE_URL_PREFIX) {
    return Err(HandlerError::new(format!(
      "invalid profile URL; expected it to start with '{PROFILE_URL_PREFIX}'"
    )));
  }
  Ok(url)
}

/// Strip tags and collapse whitespace so downstream prompts see readable
/// page text rather than markup. Script and style bodies are dropped.
fn extract_text(html: &str) -> String {
  let mut text = String::new();
  let mut rest = html;

  while let Some(open) = rest.find('<') {
    push_collapsed(&mut text, &rest[..open]);
    rest = &rest[open..];

    let Some(close) = rest.find('>') else { break };
    let tag = rest[1..close].trim().to_ascii_lowercase();
    rest = &rest[close + 1..];

    // Skip the entire element body for non-content tags.
    for skipped in ["script", "style"] {
      if tag == skipped || tag.starts_with(&format!("{skipped} ")) {
        if let Some(end) = rest.to_ascii_lowercase().find(&format!("</{skipped}")) {
          rest = &rest[end..];
        }
      }
    }
  }
  push_collapsed(&mut text, rest);

  text.trim().to_string()
}

fn push_collapsed(text: &mut String, chunk: &str) {
  for word in chunk.split_whitespace() {
    if !text.is_empty() {
      text.push(' ');
    }
    text.push_str(word);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[tokio::test]
  async fn missing_cookie_is_an_error() {
    let handler = ProfileHandler::new(None);
    let node =
      Node::new("li-1", "linkedIn").with_data("profileUrl", json!("https://www.linkedin.com/in/ada"));

    let err = handler.execute(&node, UpstreamInput::None).await.unwrap_err();
    assert!(err.message().contains("LI_AT"));
  }

  #[test]
  fn profile_url_must_match_the_expected_prefix() {
    assert!(validate_profile_url(Some("https://www.linkedin.com/in/ada")).is_ok());
    assert!(validate_profile_url(Some("https://example.com/ada")).is_err());
    assert!(validate_profile_url(None).is_err());
  }

  #[test]
  fn extract_text_drops_tags_and_script_bodies() {
    let html = "<html><script>var x = 1;</script><body><h1>Ada Lovelace</h1>\n<p>Engineer  at&nbsp;</p><p>Analytical Engines</p></body></html>";
    let text = extract_text(html);

    assert!(text.contains("Ada Lovelace"));
    assert!(text.contains("Engineer"));
    assert!(!text.contains("var x"));
    assert!(!text.contains('<'));
  }
}
