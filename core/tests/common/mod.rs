// tests/common/mod.rs
#![allow(dead_code)] // Not every test file uses every helper

use async_trait::async_trait;
use bulk_reroute::{AdminGraphql, GraphqlRequest, RelayError, RelayResult, ResultFileSource};
use parking_lot::Mutex;
use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;
use tracing::Level;

pub const OPERATION_GID: &str = "gid://shopify/BulkOperation/123";
pub const RESULT_URL: &str = "https://storage.example.com/bulk/file.jsonl";
pub const RELEASE_QUERY: &str = "query GetOrdersToRelease {\n  orders { edges { node { id } } }\n}";

// --- Scripted replies for the admin API mock ---
#[derive(Clone, Debug)]
pub enum Reply {
  Data(JsonValue),
  /// Simulates a transport-level failure.
  Unavailable,
}

/// Records every GraphQL call and answers from a per-operation script.
/// The last scripted reply for an operation repeats.
#[derive(Default)]
pub struct MockAdmin {
  script: Mutex<HashMap<&'static str, Vec<Reply>>>,
  calls: Mutex<Vec<GraphqlRequest>>,
}

impl MockAdmin {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn reply(self, operation: &'static str, reply: Reply) -> Self {
    self.script.lock().entry(operation).or_default().push(reply);
    self
  }

  pub fn data(self, operation: &'static str, data: JsonValue) -> Self {
    self.reply(operation, Reply::Data(data))
  }

  pub fn calls(&self) -> Vec<GraphqlRequest> {
    self.calls.lock().clone()
  }

  pub fn calls_to(&self, operation: &str) -> Vec<GraphqlRequest> {
    self
      .calls
      .lock()
      .iter()
      .filter(|c| c.operation_name == operation)
      .cloned()
      .collect()
  }
}

#[async_trait]
impl AdminGraphql for MockAdmin {
  async fn execute(&self, request: GraphqlRequest) -> RelayResult<JsonValue> {
    let op = request.operation_name;
    let call_index = self.calls_to(op).len();
    self.calls.lock().push(request);

    let reply = {
      let script = self.script.lock();
      let replies = script
        .get(op)
        .unwrap_or_else(|| panic!("MockAdmin: no reply scripted for {}", op));
      replies[call_index.min(replies.len() - 1)].clone()
    };
    match reply {
      Reply::Data(data) => Ok(data),
      Reply::Unavailable => Err(RelayError::Http {
        status: 503,
        reason: "Service Unavailable".to_string(),
      }),
    }
  }
}

/// Serves result files from memory and counts fetches.
#[derive(Default)]
pub struct MockFiles {
  bodies: Mutex<HashMap<String, String>>,
  fetched: Mutex<Vec<String>>,
}

impl MockFiles {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_file(self, url: &str, body: &str) -> Self {
    self.bodies.lock().insert(url.to_string(), body.to_string());
    self
  }

  pub fn fetch_count(&self) -> usize {
    self.fetched.lock().len()
  }
}

#[async_trait]
impl ResultFileSource for MockFiles {
  async fn fetch(&self, url: &str) -> RelayResult<String> {
    self.fetched.lock().push(url.to_string());
    self.bodies.lock().get(url).cloned().ok_or(RelayError::Download {
      status: 404,
      reason: "Not Found".to_string(),
    })
  }
}

// --- Response builders ---
pub fn bulk_operation_data(status: &str, query: &str, url: Option<&str>) -> JsonValue {
  json!({
    "node": {
      "id": OPERATION_GID,
      "status": status,
      "query": query,
      "errorCode": null,
      "createdAt": "2025-05-27T14:26:46Z",
      "completedAt": "2025-05-27T14:26:47Z",
      "objectCount": "241",
      "fileSize": "47230",
      "type": "QUERY",
      "url": url,
      "partialDataUrl": null
    }
  })
}

pub fn reroute_data(moved: &[&str], user_errors: &[&str]) -> JsonValue {
  json!({
    "fulfillmentOrdersReroute": {
      "movedFulfillmentOrders": moved.iter().map(|id| json!({
        "id": id,
        "status": "OPEN",
        "assignedLocation": { "location": { "id": "gid://shopify/Location/9" } }
      })).collect::<Vec<_>>(),
      "userErrors": user_errors.iter().map(|m| json!({
        "field": ["fulfillmentOrderIds"],
        "message": m
      })).collect::<Vec<_>>(),
    }
  })
}

pub fn flow_trigger_data(user_errors: &[&str]) -> JsonValue {
  json!({
    "flowTriggerReceive": {
      "userErrors": user_errors.iter().map(|m| json!({ "field": null, "message": m })).collect::<Vec<_>>()
    }
  })
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
