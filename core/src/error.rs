// bulk_reroute/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

use crate::admin::types::UserError;

#[derive(Debug, Error)]
pub enum RelayError {
  /// The inbound notification is malformed or lacks the operation id.
  #[error("Invalid webhook payload: {0}")]
  InvalidPayload(String),

  #[error("Configuration error: {0}")]
  Configuration(String),

  #[error("Bulk operation not found: {id}")]
  OperationNotFound { id: String },

  #[error("No download URL available for completed bulk operation {id}")]
  MissingResultUrl { id: String },

  #[error("Failed to download JSONL file: {status} {reason}")]
  Download { status: u16, reason: String },

  #[error("Admin API request failed: {status} {reason}")]
  Http { status: u16, reason: String },

  #[error("GraphQL errors: {0}")]
  Graphql(String),

  #[error("Mutation returned user errors: {}", format_user_errors(.0))]
  UserErrors(Vec<UserError>),

  #[error("Unexpected response shape: {0}")]
  UnexpectedResponse(String),

  #[error("Transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("Decode error: {0}")]
  Decode(#[from] serde_json::Error),

  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Step handler failed. Source: {source}")]
  HandlerError {
    #[source]
    source: AnyhowError,
  },
}

impl From<AnyhowError> for RelayError {
  fn from(err: AnyhowError) -> Self {
    match err.downcast::<RelayError>() {
      Ok(relay_err) => relay_err,
      Err(err) => RelayError::HandlerError { source: err },
    }
  }
}

fn format_user_errors(errors: &[UserError]) -> String {
  errors
    .iter()
    .map(|e| e.message.as_str())
    .collect::<Vec<_>>()
    .join("; ")
}

pub type RelayResult<T, E = RelayError> = std::result::Result<T, E>;
