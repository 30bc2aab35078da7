// bulk_reroute/src/submit.rs

//! Applies the reroute to extracted work items.

use crate::admin::queries::{
  FLOW_TRIGGER_RECEIVE_MUTATION, FLOW_TRIGGER_RECEIVE_OP, FULFILLMENT_ORDERS_REROUTE_MUTATION,
  FULFILLMENT_ORDERS_REROUTE_OP,
};
use crate::admin::types::{FlowTriggerPayload, ReroutePayload, UserError};
use crate::admin::{AdminGraphql, GraphqlRequest};
use crate::error::{RelayError, RelayResult};
use crate::extract::WorkItem;
use serde::Serialize;
use serde_json::{json, Map, Value as JsonValue};
use tracing::{error, info, instrument, warn};

pub const DEFAULT_FLOW_TRIGGER_HANDLE: &str = "reroute-fulfillment-order";

/// How work items are handed to the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RerouteStrategy {
  /// One `fulfillmentOrdersReroute` call for the whole list.
  Batch,
  /// One `flowTriggerReceive` call per item, handing off to a Flow workflow.
  FlowTrigger { handle: String },
}

impl Default for RerouteStrategy {
  fn default() -> Self {
    RerouteStrategy::Batch
  }
}

impl RerouteStrategy {
  /// Flow payloads carry the numeric order id, so items need it.
  pub fn needs_order_id(&self) -> bool {
    matches!(self, RerouteStrategy::FlowTrigger { .. })
  }
}

/// Optional location constraints forwarded with a batch reroute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationFilter {
  pub included_location_ids: Vec<String>,
  pub excluded_location_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemError {
  /// Set when the error is tied to one fulfillment order.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub fulfillment_order_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub field: Option<Vec<String>>,
  pub message: String,
}

impl ItemError {
  fn from_user_error(fulfillment_order_id: Option<&str>, user_error: UserError) -> Self {
    Self {
      fulfillment_order_id: fulfillment_order_id.map(str::to_string),
      field: user_error.field,
      message: user_error.message,
    }
  }

  fn from_failure(fulfillment_order_id: Option<&str>, err: &RelayError) -> Self {
    Self {
      fulfillment_order_id: fulfillment_order_id.map(str::to_string),
      field: None,
      message: err.to_string(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionReport {
  pub processed: usize,
  /// Ids the platform reported as moved, even when the batch also had errors.
  pub moved: Vec<String>,
  pub errors: Vec<ItemError>,
}

impl SubmissionReport {
  pub fn is_success(&self) -> bool {
    self.errors.is_empty()
  }
}

/// Submits `items` with the chosen strategy. Never fails: every problem is
/// folded into the report's error list.
pub async fn submit_work_items(
  api: &dyn AdminGraphql,
  items: &[WorkItem],
  strategy: &RerouteStrategy,
  locations: &LocationFilter,
) -> SubmissionReport {
  match strategy {
    RerouteStrategy::Batch => submit_batch_reroute(api, items, locations).await,
    RerouteStrategy::FlowTrigger { handle } => submit_flow_triggers(api, items, handle).await,
  }
}

/// One reroute mutation for the whole list.
///
/// The mutation is treated as all-or-nothing: if any user error comes back,
/// nothing is counted as processed, even if `moved` is non-empty.
#[instrument(skip_all, fields(items = items.len()))]
pub async fn submit_batch_reroute(
  api: &dyn AdminGraphql,
  items: &[WorkItem],
  locations: &LocationFilter,
) -> SubmissionReport {
  let ids: Vec<&str> = items.iter().map(|i| i.fulfillment_order_id.as_str()).collect();
  let mut variables = Map::new();
  variables.insert("fulfillmentOrderIds".to_string(), json!(ids));
  if !locations.included_location_ids.is_empty() {
    variables.insert("includedLocationIds".to_string(), json!(locations.included_location_ids));
  }
  if !locations.excluded_location_ids.is_empty() {
    variables.insert("excludedLocationIds".to_string(), json!(locations.excluded_location_ids));
  }

  let request = GraphqlRequest::new(
    FULFILLMENT_ORDERS_REROUTE_OP,
    FULFILLMENT_ORDERS_REROUTE_MUTATION,
    JsonValue::Object(variables),
  );

  let payload = match call_reroute(api, request).await {
    Ok(payload) => payload,
    Err(e) => {
      error!(error = %e, "Reroute mutation failed.");
      return SubmissionReport {
        errors: vec![ItemError::from_failure(None, &e)],
        ..Default::default()
      };
    }
  };

  let moved: Vec<String> = payload.moved_fulfillment_orders.iter().map(|m| m.id.clone()).collect();
  if !payload.user_errors.is_empty() {
    warn!(
      user_errors = payload.user_errors.len(),
      moved = moved.len(),
      "Reroute mutation returned user errors; counting batch as failed."
    );
    return SubmissionReport {
      processed: 0,
      moved,
      errors: payload
        .user_errors
        .into_iter()
        .map(|u| ItemError::from_user_error(None, u))
        .collect(),
    };
  }

  for order in &payload.moved_fulfillment_orders {
    info!(fulfillment_order_id = %order.id, location_id = ?order.location_id(), "Fulfillment order rerouted.");
  }
  SubmissionReport {
    processed: items.len(),
    moved,
    errors: Vec::new(),
  }
}

async fn call_reroute(api: &dyn AdminGraphql, request: GraphqlRequest) -> RelayResult<ReroutePayload> {
  let mut data = api.execute(request).await?;
  let payload = data
    .get_mut(FULFILLMENT_ORDERS_REROUTE_OP)
    .map(JsonValue::take)
    .filter(|p| !p.is_null())
    .ok_or_else(|| RelayError::UnexpectedResponse("fulfillmentOrdersReroute payload missing".to_string()))?;
  Ok(serde_json::from_value(payload)?)
}

/// One Flow trigger per item; failures are recorded per item and the loop
/// carries on.
#[instrument(skip_all, fields(items = items.len(), handle = %handle))]
pub async fn submit_flow_triggers(api: &dyn AdminGraphql, items: &[WorkItem], handle: &str) -> SubmissionReport {
  let mut report = SubmissionReport::default();

  for item in items {
    let fo_id = item.fulfillment_order_id.as_str();
    let variables = json!({
      "handle": handle,
      "payload": {
        "order_id": item.order_id,
        "fulfillment order id": fo_id,
      },
    });
    let request = GraphqlRequest::new(FLOW_TRIGGER_RECEIVE_OP, FLOW_TRIGGER_RECEIVE_MUTATION, variables);

    match call_flow_trigger(api, request).await {
      Ok(payload) if payload.user_errors.is_empty() => {
        info!(fulfillment_order_id = fo_id, "Flow triggered for fulfillment order.");
        report.processed += 1;
        report.moved.push(fo_id.to_string());
      }
      Ok(payload) => {
        warn!(fulfillment_order_id = fo_id, user_errors = ?payload.user_errors, "Flow trigger returned user errors.");
        report.errors.extend(
          payload
            .user_errors
            .into_iter()
            .map(|u| ItemError::from_user_error(Some(fo_id), u)),
        );
      }
      Err(e) => {
        error!(fulfillment_order_id = fo_id, error = %e, "Flow trigger failed.");
        report.errors.push(ItemError::from_failure(Some(fo_id), &e));
      }
    }
  }

  info!(
    processed = report.processed,
    total = items.len(),
    "Flow trigger submission finished."
  );
  report
}

async fn call_flow_trigger(api: &dyn AdminGraphql, request: GraphqlRequest) -> RelayResult<FlowTriggerPayload> {
  let mut data = api.execute(request).await?;
  let payload = data
    .get_mut(FLOW_TRIGGER_RECEIVE_OP)
    .map(JsonValue::take)
    .filter(|p| !p.is_null())
    .ok_or_else(|| RelayError::UnexpectedResponse("flowTriggerReceive payload missing".to_string()))?;
  Ok(serde_json::from_value(payload)?)
}
