// bulk_reroute/src/subscription.rs

//! Keeps one `BULK_OPERATIONS_FINISH` webhook subscription pointed at this
//! service, remembering its id in an injected store.

use crate::admin::queries::{
  WEBHOOK_SUBSCRIPTIONS_OP, WEBHOOK_SUBSCRIPTIONS_QUERY, WEBHOOK_SUBSCRIPTION_CREATE_MUTATION,
  WEBHOOK_SUBSCRIPTION_CREATE_OP, WEBHOOK_SUBSCRIPTION_OP, WEBHOOK_SUBSCRIPTION_QUERY,
  WEBHOOK_SUBSCRIPTION_UPDATE_MUTATION, WEBHOOK_SUBSCRIPTION_UPDATE_OP,
};
use crate::admin::types::{UserError, WebhookSubscription};
use crate::admin::{AdminGraphql, GraphqlRequest};
use crate::error::{RelayError, RelayResult};
use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tracing::{info, instrument, warn};

pub const BULK_OPERATIONS_FINISH_TOPIC: &str = "BULK_OPERATIONS_FINISH";
const SUBSCRIPTION_PAGE_SIZE: u32 = 100;

/// Where the id of the managed subscription is remembered between runs.
pub trait SubscriptionIdStore: Send + Sync {
  fn get(&self) -> Option<String>;
  fn set(&self, id: String);
}

#[derive(Debug, Default)]
pub struct InMemorySubscriptionStore {
  id: RwLock<Option<String>>,
}

impl InMemorySubscriptionStore {
  pub fn new(initial: Option<String>) -> Self {
    Self {
      id: RwLock::new(initial.filter(|id| !id.trim().is_empty())),
    }
  }
}

impl SubscriptionIdStore for InMemorySubscriptionStore {
  fn get(&self) -> Option<String> {
    self.id.read().clone()
  }

  fn set(&self, id: String) {
    *self.id.write() = Some(id);
  }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionMutationPayload {
  #[serde(default)]
  webhook_subscription: Option<WebhookSubscription>,
  #[serde(default)]
  user_errors: Vec<UserError>,
}

#[derive(Deserialize)]
struct SubscriptionEdge {
  node: WebhookSubscription,
}

#[derive(Deserialize)]
struct SubscriptionConnection {
  #[serde(default)]
  edges: Vec<SubscriptionEdge>,
}

fn take_field(mut data: JsonValue, field: &str) -> Option<JsonValue> {
  data.get_mut(field).map(JsonValue::take).filter(|v| !v.is_null())
}

async fn subscription_by_id(api: &dyn AdminGraphql, id: &str) -> RelayResult<Option<WebhookSubscription>> {
  let data = api
    .execute(GraphqlRequest::new(
      WEBHOOK_SUBSCRIPTION_OP,
      WEBHOOK_SUBSCRIPTION_QUERY,
      json!({ "id": id }),
    ))
    .await?;
  let subscription = match take_field(data, WEBHOOK_SUBSCRIPTION_OP) {
    Some(value) => serde_json::from_value::<WebhookSubscription>(value)?,
    None => return Ok(None),
  };
  Ok(Some(subscription).filter(|s| s.topic == BULK_OPERATIONS_FINISH_TOPIC))
}

async fn find_bulk_finish_subscription(api: &dyn AdminGraphql) -> RelayResult<Option<WebhookSubscription>> {
  let data = api
    .execute(GraphqlRequest::new(
      WEBHOOK_SUBSCRIPTIONS_OP,
      WEBHOOK_SUBSCRIPTIONS_QUERY,
      json!({ "first": SUBSCRIPTION_PAGE_SIZE }),
    ))
    .await?;
  let connection: SubscriptionConnection = match take_field(data, WEBHOOK_SUBSCRIPTIONS_OP) {
    Some(value) => serde_json::from_value(value)?,
    None => return Ok(None),
  };
  Ok(
    connection
      .edges
      .into_iter()
      .map(|e| e.node)
      .find(|s| s.topic == BULK_OPERATIONS_FINISH_TOPIC),
  )
}

async fn run_subscription_mutation(
  api: &dyn AdminGraphql,
  request: GraphqlRequest,
) -> RelayResult<WebhookSubscription> {
  let op = request.operation_name;
  let data = api.execute(request).await?;
  let payload: SubscriptionMutationPayload = match take_field(data, op) {
    Some(value) => serde_json::from_value(value)?,
    None => return Err(RelayError::UnexpectedResponse(format!("{} payload missing", op))),
  };
  if !payload.user_errors.is_empty() {
    return Err(RelayError::UserErrors(payload.user_errors));
  }
  payload
    .webhook_subscription
    .ok_or_else(|| RelayError::UnexpectedResponse(format!("{} returned no subscription", op)))
}

fn subscription_input(callback_url: &str) -> JsonValue {
  json!({ "callbackUrl": callback_url, "format": "JSON" })
}

/// Makes sure a bulk-finish subscription delivers to `callback_url`.
///
/// Prefers the tracked id, falls back to any existing subscription for the
/// topic, updates the callback if it moved, and creates one if none exist.
/// Failed lookups count as "not found"; only the update and create
/// mutations can fail the call. The resulting id is written back to `store`.
#[instrument(skip(api, store), err(Display))]
pub async fn ensure_webhook_subscription(
  api: &dyn AdminGraphql,
  store: &dyn SubscriptionIdStore,
  callback_url: &str,
) -> RelayResult<WebhookSubscription> {
  let mut existing = None;
  if let Some(tracked_id) = store.get() {
    info!(%tracked_id, "Checking tracked webhook subscription.");
    existing = subscription_by_id(api, &tracked_id).await.unwrap_or_else(|e| {
      warn!(%tracked_id, error = %e, "Tracked subscription lookup failed.");
      None
    });
    if existing.is_none() {
      warn!(%tracked_id, "Tracked subscription not usable, searching by topic.");
    }
  }
  if existing.is_none() {
    existing = find_bulk_finish_subscription(api).await.unwrap_or_else(|e| {
      warn!(error = %e, "Subscription search failed, creating a new one.");
      None
    });
  }

  let subscription = match existing {
    Some(current) if current.callback_url() == Some(callback_url) => current,
    Some(current) => {
      info!(id = %current.id, from = ?current.callback_url(), to = %callback_url, "Updating webhook callback URL.");
      run_subscription_mutation(
        api,
        GraphqlRequest::new(
          WEBHOOK_SUBSCRIPTION_UPDATE_OP,
          WEBHOOK_SUBSCRIPTION_UPDATE_MUTATION,
          json!({ "id": current.id, "webhookSubscription": subscription_input(callback_url) }),
        ),
      )
      .await?
    }
    None => {
      info!(%callback_url, "Creating webhook subscription.");
      run_subscription_mutation(
        api,
        GraphqlRequest::new(
          WEBHOOK_SUBSCRIPTION_CREATE_OP,
          WEBHOOK_SUBSCRIPTION_CREATE_MUTATION,
          json!({ "topic": BULK_OPERATIONS_FINISH_TOPIC, "webhookSubscription": subscription_input(callback_url) }),
        ),
      )
      .await?
    }
  };

  store.set(subscription.id.clone());
  info!(id = %subscription.id, url = ?subscription.callback_url(), "Webhook subscription ensured.");
  Ok(subscription)
}
