// bulk_reroute/src/outcome.rs
use crate::error::RelayError;
use crate::submit::ItemError;
use serde::Serialize;

/// How the boundary should report an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
  Ok,
  BadRequest,
  Failed,
}

impl OutcomeStatus {
  pub fn http_status(self) -> u16 {
    match self {
      OutcomeStatus::Ok => 200,
      OutcomeStatus::BadRequest => 400,
      OutcomeStatus::Failed => 500,
    }
  }
}

/// Result of one webhook invocation; serialized as the response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingOutcome {
  pub success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub bulk_operation_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
  /// Records decoded from the result file.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub records_downloaded: Option<usize>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub matched: Option<usize>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub processed: Option<usize>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub errors: Vec<ItemError>,
}

impl ProcessingOutcome {
  /// `message` and `error` both carry the error text.
  pub fn failed(bulk_operation_id: Option<String>, err: &RelayError) -> Self {
    let text = err.to_string();
    Self {
      success: false,
      bulk_operation_id,
      message: Some(text.clone()),
      error: Some(text),
      ..Default::default()
    }
  }

  pub fn status(&self) -> OutcomeStatus {
    if self.success {
      OutcomeStatus::Ok
    } else {
      OutcomeStatus::Failed
    }
  }
}
