// bulk_reroute/src/settings.rs
use crate::extract::{ExtractRule, ReferencePattern};
use crate::submit::{LocationFilter, RerouteStrategy};

/// Prefix identifying bulk queries this relay is allowed to act on.
pub const DEFAULT_QUERY_MARKER: &str = "query GetOrdersToRelease";

#[derive(Debug, Clone)]
pub struct RelaySettings {
  pub query_marker: String,
  pub extract_rule: ExtractRule,
  pub strategy: RerouteStrategy,
  pub locations: LocationFilter,
}

impl Default for RelaySettings {
  fn default() -> Self {
    Self::new(RerouteStrategy::Batch)
  }
}

impl RelaySettings {
  /// Settings for `strategy`, with an extract rule that derives order ids
  /// whenever the strategy needs them.
  pub fn new(strategy: RerouteStrategy) -> Self {
    let mut extract_rule = ExtractRule::default();
    if strategy.needs_order_id() {
      extract_rule = extract_rule.with_reference(ReferencePattern::order_reference());
    }
    Self {
      query_marker: DEFAULT_QUERY_MARKER.to_string(),
      extract_rule,
      strategy,
      locations: LocationFilter::default(),
    }
  }

  pub fn with_query_marker(mut self, marker: impl Into<String>) -> Self {
    self.query_marker = marker.into();
    self
  }

  pub fn with_locations(mut self, locations: LocationFilter) -> Self {
    self.locations = locations;
    self
  }
}

/// Splits a comma-separated id list, dropping blanks.
pub fn parse_id_list(raw: &str) -> Vec<String> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
    .collect()
}
