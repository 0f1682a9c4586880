//! Shared text shaping for handlers that fold upstream outputs into text.

/// Pretty-print upstream outputs that parse as JSON objects; pass
/// everything else through unchanged.
pub(crate) fn pretty_json_or_raw(output: &str) -> String {
  match serde_json::from_str::<serde_json::Value>(output) {
    Ok(value @ serde_json::Value::Object(_)) => {
      serde_json::to_string_pretty(&value).unwrap_or_else(|_| output.to_string())
    }
    _ => output.to_string(),
  }
}
