// bulk_reroute/src/extract.rs

//! Selects actionable fulfillment orders out of parsed result records.

use crate::jsonl::ParsedRecord;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

pub const DEFAULT_TYPENAME: &str = "FulfillmentOrder";
pub const DEFAULT_ID_FIELD: &str = "id";
pub const DEFAULT_REFERENCE_FIELD: &str = "order_reference";

/// A fulfillment order to reroute, with the numeric order id when one was derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
  pub fulfillment_order_id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub order_id: Option<u64>,
}

/// Derives a numeric id from a reference string such as `gid://shopify/Order/12345`.
/// The pattern's first capture group must be the digits.
#[derive(Debug, Clone)]
pub struct ReferencePattern {
  pub field: String,
  pattern: Regex,
}

impl ReferencePattern {
  pub fn new(field: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
    Ok(Self {
      field: field.into(),
      pattern: Regex::new(pattern)?,
    })
  }

  /// Trailing `/Order/<digits>` of the `order_reference` field.
  pub fn order_reference() -> Self {
    Self {
      field: DEFAULT_REFERENCE_FIELD.to_string(),
      pattern: Regex::new(r"/Order/(\d+)$").expect("static pattern is valid"),
    }
  }

  pub fn derive(&self, record: &ParsedRecord) -> Option<u64> {
    let reference = record.str_field(&self.field)?;
    let caps = self.pattern.captures(reference)?;
    caps.get(1)?.as_str().parse().ok()
  }
}

#[derive(Debug, Clone)]
pub struct ExtractRule {
  pub typename: String,
  pub id_field: String,
  /// When set, records without a derivable secondary id are dropped.
  pub reference: Option<ReferencePattern>,
}

impl Default for ExtractRule {
  fn default() -> Self {
    Self {
      typename: DEFAULT_TYPENAME.to_string(),
      id_field: DEFAULT_ID_FIELD.to_string(),
      reference: None,
    }
  }
}

impl ExtractRule {
  pub fn with_reference(mut self, reference: ReferencePattern) -> Self {
    self.reference = Some(reference);
    self
  }

  fn apply(&self, record: &ParsedRecord) -> Option<WorkItem> {
    if record.typename() != Some(self.typename.as_str()) {
      return None;
    }
    let fulfillment_order_id = record.str_field(&self.id_field)?.to_string();
    let order_id = match &self.reference {
      Some(reference) => Some(reference.derive(record)?),
      None => None,
    };
    Some(WorkItem {
      fulfillment_order_id,
      order_id,
    })
  }
}

/// Keeps records of the rule's type that carry the id field, in input order.
pub fn extract_work_items(records: &[ParsedRecord], rule: &ExtractRule) -> Vec<WorkItem> {
  let items: Vec<WorkItem> = records.iter().filter_map(|r| rule.apply(r)).collect();
  debug!(
    matched = items.len(),
    total = records.len(),
    typename = %rule.typename,
    "Extracted work items."
  );
  items
}
