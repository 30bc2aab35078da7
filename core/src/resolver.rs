// bulk_reroute/src/resolver.rs
use crate::admin::queries::{GET_BULK_OPERATION_OP, GET_BULK_OPERATION_QUERY};
use crate::admin::types::BulkOperation;
use crate::admin::{AdminGraphql, GraphqlRequest};
use crate::error::RelayResult;
use serde_json::{json, Value as JsonValue};
use tracing::{info, instrument};

/// Looks up a bulk operation by global id. Always hits the API; no caching,
/// no retry. `Ok(None)` when the node does not exist.
#[instrument(skip(api), err(Display))]
pub async fn resolve_bulk_operation(api: &dyn AdminGraphql, id: &str) -> RelayResult<Option<BulkOperation>> {
  let data = api
    .execute(GraphqlRequest::new(
      GET_BULK_OPERATION_OP,
      GET_BULK_OPERATION_QUERY,
      json!({ "id": id }),
    ))
    .await?;

  let node = match data.get("node") {
    None | Some(JsonValue::Null) => return Ok(None),
    Some(node) => node.clone(),
  };
  // `node` matches any type; a non-BulkOperation node comes back without fields.
  if node.as_object().is_some_and(|o| o.is_empty()) {
    return Ok(None);
  }

  let operation: BulkOperation = serde_json::from_value(node)?;
  info!(
    id = %operation.id,
    status = ?operation.status,
    operation_type = ?operation.operation_type,
    object_count = ?operation.object_count(),
    "Bulk operation resolved."
  );
  Ok(Some(operation))
}
