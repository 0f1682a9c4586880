//! `cultureFit` node handler.

use async_trait::async_trait;
use vortex_engine::{HandlerError, NodeHandler, UpstreamInput};
use vortex_graph::Node;

/// Trait weights applied when the editor supplies none.
const DEFAULT_WEIGHTS: [(&str, f64); 5] = [
  ("resourcefulness", 5.0),
  ("optimism", 4.0),
  ("excitement", 4.0),
  ("reliability", 3.0),
  ("teamwork", 3.0),
];

/// Formats company values and trait weights into the evaluation block a
/// downstream AI node folds into its prompt.
#[derive(Debug, Clone, Default)]
pub struct CultureFitHandler;

#[async_trait]
impl NodeHandler for CultureFitHandler {
  async fn execute(&self, node: &Node, _upstream: UpstreamInput) -> Result<String, HandlerError> {
    let company_values = node
      .data
      .get_str("companyValues")
      .unwrap_or_default()
      .trim()
      .to_string();
    if company_values.is_empty() {
      return Err(HandlerError::new("company values cannot be empty"));
    }

    let weights = match node.data.get("weights") {
      Some(value) => parse_weights(value)?,
      None => DEFAULT_WEIGHTS
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect(),
    };

    let weights_string = weights
      .iter()
      .map(|(k, v)| format!("{k}: {v}"))
      .collect::<Vec<_>>()
      .join(", ");

    Ok(format!(
      "Company Values: {company_values}\nWeights: {weights_string}"
    ))
  }
}

/// Weights must be a non-empty mapping of trait name to a number in 1..=10.
fn parse_weights(value: &serde_json::Value) -> Result<Vec<(String, f64)>, HandlerError> {
  let map = value
    .as_object()
    .filter(|m| !m.is_empty())
    .ok_or_else(|| HandlerError::new("weights must be a non-empty mapping of trait to number"))?;

  let mut weights = Vec::with_capacity(map.len());
  for (trait_name, raw) in map {
    let weight = raw
      .as_f64()
      .filter(|w| (1.0..=10.0).contains(w))
      .ok_or_else(|| {
        HandlerError::new(format!(
          "invalid weight for {trait_name}: must be between 1 and 10"
        ))
      })?;
    weights.push((trait_name.clone(), weight));
  }
  Ok(weights)
}
