//! Vortex built-in node handlers.
//!
//! Each handler implements the engine's [`vortex_engine::NodeHandler`]
//! contract for one node type; [`builtin_registry`] wires the full table:
//!
//! | node type      | handler                                  |
//! |----------------|------------------------------------------|
//! | `askAI`        | [`AskAiHandler`] via a [`ModelClient`]   |
//! | `combineText`  | [`CombineTextHandler`]                   |
//! | `pdfGenerator` | [`DocumentHandler`] + [`ArtifactStore`]  |
//! | `linkedIn`     | [`ProfileHandler`]                       |
//! | `typeform`     | [`FormHandler`]                          |
//! | `cultureFit`   | [`CultureFitHandler`]                    |
//!
//! New node types plug in by registering another handler; the engine does
//! not change.

mod artifact;
mod ask_ai;
mod combine_text;
mod config;
mod culture_fit;
mod document;
mod form;
mod model;
mod profile;
mod text;

pub use artifact::{ArtifactError, ArtifactStore, FsArtifactStore};
pub use ask_ai::AskAiHandler;
pub use combine_text::CombineTextHandler;
pub use config::{DEFAULT_GEMINI_MODEL, HandlerConfig};
pub use culture_fit::CultureFitHandler;
pub use document::DocumentHandler;
pub use form::FormHandler;
pub use model::{EchoModel, GeminiClient, ModelClient, ModelError, create_model_client};
pub use profile::ProfileHandler;

use std::sync::Arc;

use vortex_engine::{HandlerRegistry, RegistryError};

/// Build the registry of built-in handlers under their node type keys.
pub fn builtin_registry(config: &HandlerConfig) -> Result<HandlerRegistry, RegistryError> {
  let model = create_model_client(config);
  let store = Arc::new(FsArtifactStore::new(config.artifacts_dir.clone()));

  let mut registry = HandlerRegistry::new();
  registry.register("askAI", Arc::new(AskAiHandler::new(model)))?;
  registry.register("combineText", Arc::new(CombineTextHandler))?;
  registry.register("pdfGenerator", Arc::new(DocumentHandler::new(store)))?;
  registry.register(
    "linkedIn",
    Arc::new(ProfileHandler::new(config.linkedin_cookie.clone())),
  )?;
  registry.register("typeform", Arc::new(FormHandler::new()))?;
  registry.register("cultureFit", Arc::new(CultureFitHandler))?;
  Ok(registry)
}
