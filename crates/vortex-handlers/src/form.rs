//! `typeform` node handler.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use vortex_engine::{HandlerError, NodeHandler, UpstreamInput};
use vortex_graph::Node;

const TYPEFORM_BASE_URL: &str = "https://api.typeform.com";

/// Pulls the latest response from a Typeform form and maps field ids to
/// question titles.
pub struct FormHandler {
  http: Client,
  base_url: String,
}

impl FormHandler {
  pub fn new() -> Self {
    Self::with_base_url(TYPEFORM_BASE_URL)
  }

  pub fn with_base_url(base_url: impl Into<String>) -> Self {
    Self {
      http: Client::new(),
      base_url: base_url.into(),
    }
  }
}

impl Default for FormHandler {
  fn default() -> Self {
    Self::new()
  }
}

#[derive(Debug, Deserialize)]
struct ResponsesPage {
  #[serde(default)]
  items: Vec<FormResponse>,
}

#[derive(Debug, Deserialize)]
struct FormResponse {
  submitted_at: Option<String>,
  #[serde(default)]
  answers: Vec<Answer>,
}

#[derive(Debug, Deserialize)]
struct Answer {
  field: FieldRef,
  #[serde(rename = "type")]
  answer_type: String,
  #[serde(flatten)]
  values: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct FieldRef {
  id: String,
}

#[derive(Debug, Deserialize)]
struct FormDefinition {
  #[serde(default)]
  fields: Vec<FormField>,
}

#[derive(Debug, Deserialize)]
struct FormField {
  id: String,
  #[serde(default)]
  title: String,
}

#[async_trait]
impl NodeHandler for FormHandler {
  async fn execute(&self, node: &Node, _upstream: UpstreamInput) -> Result<String, HandlerError> {
    let form_id = node
      .data
      .get_str("formId")
      .ok_or_else(|| HandlerError::new("no form id provided"))?;
    let api_key = node
      .data
      .get_str("apiKey")
      .ok_or_else(|| HandlerError::new("no API key provided"))?;

    info!(node_id = %node.id, form_id = %form_id, "fetching form responses");

    let responses: ResponsesPage = self
      .get_json(
        &format!(
          "{}/forms/{form_id}/responses?sort=submitted_at,desc",
          self.base_url
        ),
        api_key,
      )
      .await?;

    let Some(latest) = responses.items.into_iter().next() else {
      return Ok("No responses found.".to_string());
    };

    let form: FormDefinition = self
      .get_json(&format!("{}/forms/{form_id}", self.base_url), api_key)
      .await?;

    let summary = summarize_response(&form, latest);
    serde_json::to_string_pretty(&summary)
      .map_err(|e| HandlerError::new(format!("failed to encode form response: {e}")))
  }
}

impl FormHandler {
  async fn get_json<T: serde::de::DeserializeOwned>(
    &self,
    url: &str,
    api_key: &str,
  ) -> Result<T, HandlerError> {
    self
      .http
      .get(url)
      .bearer_auth(api_key)
      .header("Accept", "application/json")
      .send()
      .await
      .and_then(|r| r.error_for_status())
      .map_err(|e| HandlerError::new(format!("form fetch failed: {e}")))?
      .json()
      .await
      .map_err(|e| HandlerError::new(format!("form fetch failed: {e}")))
  }
}

/// Reduce a raw response to `{submitted_at, answers}` keyed by question
/// title, pulling the typed value out of each answer.
fn summarize_response(form: &FormDefinition, response: FormResponse) -> serde_json::Value {
  let titles: HashMap<&str, &str> = form
    .fields
    .iter()
    .map(|f| (f.id.as_str(), f.title.as_str()))
    .collect();

  let mut answers = serde_json::Map::new();
  for answer in response.answers {
    let question = titles
      .get(answer.field.id.as_str())
      .map(|t| t.to_string())
      .unwrap_or_else(|| answer.field.id.clone());
    answers.insert(question, answer_value(&answer));
  }

  json!({
    "submitted_at": response.submitted_at,
    "answers": answers,
  })
}

fn answer_value(answer: &Answer) -> serde_json::Value {
  let raw = answer.values.get(answer.answer_type.as_str());
  match (answer.answer_type.as_str(), raw) {
    ("choice", Some(choice)) => choice.get("label").cloned().unwrap_or_default(),
    (_, Some(value)) => value.clone(),
    (_, None) => serde_json::Value::Null,
  }
}
