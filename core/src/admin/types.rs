// bulk_reroute/src/admin/types.rs

//! Decoded shapes of the admin API responses the relay consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform status of a bulk operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BulkOperationStatus {
  Created,
  Running,
  Completed,
  Canceling,
  Canceled,
  Failed,
  Expired,
  #[serde(other)]
  Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOperation {
  pub id: String,
  pub status: BulkOperationStatus,
  #[serde(default)]
  pub query: Option<String>,
  #[serde(default)]
  pub error_code: Option<String>,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub completed_at: Option<DateTime<Utc>>,
  /// UnsignedInt64 scalars arrive as strings.
  #[serde(default)]
  pub object_count: Option<String>,
  #[serde(default)]
  pub file_size: Option<String>,
  #[serde(default, rename = "type")]
  pub operation_type: Option<String>,
  #[serde(default)]
  url: Option<String>,
  #[serde(default)]
  pub partial_data_url: Option<String>,
}

impl BulkOperation {
  pub fn is_completed(&self) -> bool {
    self.status == BulkOperationStatus::Completed
  }

  /// The result file location. Only exposed once the operation is completed.
  pub fn result_url(&self) -> Option<&str> {
    if !self.is_completed() {
      return None;
    }
    self.url.as_deref().filter(|u| !u.is_empty())
  }

  pub fn object_count(&self) -> Option<u64> {
    self.object_count.as_deref().and_then(|c| c.parse().ok())
  }

  pub fn query_starts_with(&self, marker: &str) -> bool {
    self.query.as_deref().is_some_and(|q| q.starts_with(marker))
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
  #[serde(default)]
  pub field: Option<Vec<String>>,
  pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovedFulfillmentOrder {
  pub id: String,
  #[serde(default)]
  pub status: Option<String>,
  #[serde(default)]
  pub assigned_location: Option<AssignedLocation>,
}

impl MovedFulfillmentOrder {
  pub fn location_id(&self) -> Option<&str> {
    self
      .assigned_location
      .as_ref()
      .and_then(|a| a.location.as_ref())
      .map(|l| l.id.as_str())
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignedLocation {
  #[serde(default)]
  pub location: Option<LocationRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationRef {
  pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReroutePayload {
  #[serde(default)]
  pub moved_fulfillment_orders: Vec<MovedFulfillmentOrder>,
  #[serde(default)]
  pub user_errors: Vec<UserError>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowTriggerPayload {
  #[serde(default)]
  pub user_errors: Vec<UserError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebhookEndpoint {
  #[serde(default, rename = "callbackUrl")]
  pub callback_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebhookSubscription {
  pub id: String,
  pub topic: String,
  #[serde(default)]
  pub endpoint: Option<WebhookEndpoint>,
}

impl WebhookSubscription {
  pub fn callback_url(&self) -> Option<&str> {
    self.endpoint.as_ref().and_then(|e| e.callback_url.as_deref())
  }
}
