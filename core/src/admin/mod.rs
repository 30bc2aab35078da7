// bulk_reroute/src/admin/mod.rs

//! Seams to the remote platform: the admin GraphQL endpoint and the plain
//! HTTP download of bulk result files.

pub mod client;
pub mod queries;
pub mod types;

use crate::error::RelayResult;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value as JsonValue;

pub use client::{AdminClient, AdminCredentials, HttpResultFiles, DEFAULT_API_VERSION};

/// One GraphQL call. `operation_name` matches the operation declared in `query`.
#[derive(Debug, Clone, Serialize)]
pub struct GraphqlRequest {
  #[serde(rename = "operationName")]
  pub operation_name: &'static str,
  pub query: &'static str,
  pub variables: JsonValue,
}

impl GraphqlRequest {
  pub fn new(operation_name: &'static str, query: &'static str, variables: JsonValue) -> Self {
    Self {
      operation_name,
      query,
      variables,
    }
  }
}

/// Executes admin GraphQL calls and returns the response's `data` member.
///
/// A response carrying top-level `errors` is an `Err`; user errors inside
/// mutation payloads are part of `data` and left to the caller.
#[async_trait]
pub trait AdminGraphql: Send + Sync {
  async fn execute(&self, request: GraphqlRequest) -> RelayResult<JsonValue>;
}

/// Fetches a bulk operation's result file as text.
#[async_trait]
pub trait ResultFileSource: Send + Sync {
  async fn fetch(&self, url: &str) -> RelayResult<String>;
}
