// bulk_reroute/src/jsonl.rs

//! Line-delimited JSON decoding for bulk result files.

use serde_json::Value as JsonValue;
use tracing::warn;

/// One decoded line of a result file. The shape is whatever the export
/// produced, so fields are looked up at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord(JsonValue);

impl ParsedRecord {
  pub fn value(&self) -> &JsonValue {
    &self.0
  }

  /// The `__typename` discriminator, when present and a string.
  pub fn typename(&self) -> Option<&str> {
    self.str_field("__typename")
  }

  /// A string field, `None` when missing, not a string, or empty.
  pub fn str_field(&self, name: &str) -> Option<&str> {
    self.0.get(name).and_then(JsonValue::as_str).filter(|s| !s.is_empty())
  }

  /// Empty objects are filler rows emitted by the export.
  pub fn is_placeholder(&self) -> bool {
    matches!(&self.0, JsonValue::Object(map) if map.is_empty())
  }
}

/// Decodes `text` line by line, keeping file order.
///
/// Blank lines are ignored and undecodable lines are logged and dropped, so
/// one corrupt line never fails the file.
pub fn parse_jsonl(text: &str) -> Vec<ParsedRecord> {
  let mut records = Vec::new();
  for (idx, raw_line) in text.lines().enumerate() {
    let line = raw_line.trim();
    if line.is_empty() {
      continue;
    }
    match serde_json::from_str::<JsonValue>(line) {
      Ok(value) => records.push(ParsedRecord(value)),
      Err(e) => warn!(line_number = idx + 1, error = %e, line, "Failed to parse JSONL line, dropping it."),
    }
  }
  records
}
