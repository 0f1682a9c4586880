//! Model client seam for the AI handlers.
//!
//! The `askAI` handler talks to whatever implements [`ModelClient`]:
//! [`GeminiClient`] posts a `generateContent` request to the hosted API,
//! [`EchoModel`] answers locally so graph plumbing can be exercised
//! without credentials or network access.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::HandlerConfig;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Errors from the model backend.
#[derive(Debug, Error)]
pub enum ModelError {
  #[error("model request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("model API error: {0}")]
  Api(String),

  #[error("model returned no candidates")]
  EmptyResponse,
}

/// A client that turns a prompt into a completion.
#[async_trait]
pub trait ModelClient: Send + Sync {
  async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}

/// Select a model client from the configuration: hosted Gemini when an
/// API key is present, offline echo otherwise.
pub fn create_model_client(config: &HandlerConfig) -> Arc<dyn ModelClient> {
  match &config.gemini_api_key {
    Some(key) => Arc::new(GeminiClient::new(key.clone(), config.gemini_model.clone())),
    None => Arc::new(EchoModel),
  }
}

/// Offline client that echoes the prompt back as the response.
#[derive(Debug, Clone, Default)]
pub struct EchoModel;

#[async_trait]
impl ModelClient for EchoModel {
  async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
    Ok(format!("AI Response: {prompt}"))
  }
}

/// Google Gemini `generateContent` client.
pub struct GeminiClient {
  http: Client,
  api_key: String,
  model: String,
}

impl GeminiClient {
  pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
    Self {
      http: Client::new(),
      api_key: api_key.into(),
      model: model.into(),
    }
  }
}

// ── Request types ────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
  contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
  parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
  text: &'a str,
}

// ── Response types ───────────────────────────────────────────────

#[derive(Deserialize)]
struct GenerateResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
  error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Candidate {
  content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
  #[serde(default)]
  parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
  #[serde(default)]
  text: String,
}

#[derive(Deserialize)]
struct ApiError {
  message: String,
}

#[async_trait]
impl ModelClient for GeminiClient {
  async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
    let url = format!(
      "{GEMINI_BASE_URL}/{}:generateContent?key={}",
      self.model, self.api_key
    );
    let request = GenerateRequest {
      contents: vec![Content {
        parts: vec![Part { text: prompt }],
      }],
    };

    debug!(model = %self.model, "sending generate request");
    let response: GenerateResponse = self
      .http
      .post(&url)
      .json(&request)
      .send()
      .await?
      .json()
      .await?;

    if let Some(error) = response.error {
      return Err(ModelError::Api(error.message));
    }

    response
      .candidates
      .into_iter()
      .next()
      .and_then(|c| c.content.parts.into_iter().next())
      .map(|p| p.text)
      .ok_or(ModelError::EmptyResponse)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn echo_model_wraps_the_prompt() {
    let output = EchoModel.generate("hi").await.unwrap();
    assert_eq!(output, "AI Response: hi");
  }

  #[tokio::test]
  async fn missing_api_key_selects_the_echo_model() {
    let config = HandlerConfig::new("/tmp/artifacts");
    assert!(config.gemini_api_key.is_none());

    // No key configured: generate must not require network access.
    let client = create_model_client(&config);
    assert_eq!(client.generate("ping").await.unwrap(), "AI Response: ping");
  }
}
