//! Handler configuration.

use std::env;
use std::path::PathBuf;

/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro-latest";

/// Configuration shared by the built-in handlers.
#[derive(Debug, Clone)]
pub struct HandlerConfig {
  /// API key for the hosted model backend. `None` selects the offline
  /// echo model.
  pub gemini_api_key: Option<String>,
  /// Model name used for generate requests.
  pub gemini_model: String,
  /// LinkedIn session cookie (`li_at`) for profile fetches.
  pub linkedin_cookie: Option<String>,
  /// Directory where generated documents are stored.
  pub artifacts_dir: PathBuf,
}

impl HandlerConfig {
  /// Build a configuration with defaults and no credentials.
  pub fn new(artifacts_dir: impl Into<PathBuf>) -> Self {
    Self {
      gemini_api_key: None,
      gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
      linkedin_cookie: None,
      artifacts_dir: artifacts_dir.into(),
    }
  }

  /// Read credentials from the environment (`GEMINI_API_KEY`,
  /// `GEMINI_MODEL`, `LI_AT`).
  pub fn from_env(artifacts_dir: impl Into<PathBuf>) -> Self {
    let mut config = Self::new(artifacts_dir);
    config.gemini_api_key = non_empty_var("GEMINI_API_KEY");
    if let Some(model) = non_empty_var("GEMINI_MODEL") {
      config.gemini_model = model;
    }
    config.linkedin_cookie = non_empty_var("LI_AT");
    config
  }
}

fn non_empty_var(name: &str) -> Option<String> {
  env::var(name).ok().filter(|v| !v.trim().is_empty())
}
