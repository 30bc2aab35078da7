// bulk_reroute/src/webhook.rs

//! The bulk-operation-finished webhook, run as a step pipeline:
//! resolve the operation, gate on its query family and status, download and
//! parse the result file, extract fulfillment orders, submit the reroute.

use crate::admin::types::BulkOperation;
use crate::admin::{AdminGraphql, ResultFileSource};
use crate::error::{RelayError, RelayResult};
use crate::extract::{extract_work_items, WorkItem};
use crate::jsonl::{parse_jsonl, ParsedRecord};
use crate::outcome::{OutcomeStatus, ProcessingOutcome};
use crate::pipeline::{ContextData, Pipeline, PipelineControl, PipelineResult};
use crate::resolver::resolve_bulk_operation;
use crate::settings::RelaySettings;
use crate::submit::{submit_work_items, SubmissionReport};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Payload key carrying the bulk operation's global id.
pub const OPERATION_ID_KEY: &str = "admin_graphql_api_id";

pub const MSG_WRONG_QUERY: &str = "Bulk operation skipped - wrong query type";
pub const MSG_NOT_COMPLETED: &str = "Bulk operation not completed yet";
pub const MSG_NOTHING_TO_PROCESS: &str = "No fulfillment orders to process";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOperationNotification {
  pub admin_graphql_api_id: String,
}

impl BulkOperationNotification {
  /// Requires a non-empty string under `admin_graphql_api_id`.
  pub fn from_payload(payload: &JsonValue) -> RelayResult<Self> {
    match payload.get(OPERATION_ID_KEY).and_then(JsonValue::as_str).map(str::trim) {
      Some(id) if !id.is_empty() => Ok(Self {
        admin_graphql_api_id: id.to_string(),
      }),
      _ => Err(RelayError::InvalidPayload(format!("missing {}", OPERATION_ID_KEY))),
    }
  }
}

/// State carried through one invocation.
pub struct RerouteCtxData {
  pub api: Arc<dyn AdminGraphql>,
  pub files: Arc<dyn ResultFileSource>,
  pub settings: Arc<RelaySettings>,
  pub notification: BulkOperationNotification,
  pub operation: Option<BulkOperation>,
  pub records: Vec<ParsedRecord>,
  pub records_downloaded: Option<usize>,
  pub work_items: Vec<WorkItem>,
  pub report: Option<SubmissionReport>,
  /// Why the run stopped early, if it did.
  pub message: Option<String>,
}

impl RerouteCtxData {
  fn operation_id(&self) -> &str {
    &self.notification.admin_graphql_api_id
  }

  fn outcome(&self) -> ProcessingOutcome {
    let mut outcome = ProcessingOutcome {
      success: true,
      bulk_operation_id: Some(self.operation_id().to_string()),
      message: self.message.clone(),
      records_downloaded: self.records_downloaded,
      ..Default::default()
    };
    if self.records_downloaded.is_some() {
      outcome.matched = Some(self.work_items.len());
      outcome.processed = Some(0);
    }
    if let Some(report) = &self.report {
      outcome.success = report.is_success();
      outcome.processed = Some(report.processed);
      outcome.errors = report.errors.clone();
    }
    outcome
  }
}

pub const STEP_RESOLVE: &str = "resolve_operation";
pub const STEP_QUERY_FAMILY: &str = "check_query_family";
pub const STEP_COMPLETION: &str = "check_completion";
pub const STEP_DOWNLOAD: &str = "download_results";
pub const STEP_EXTRACT: &str = "extract_work_items";
pub const STEP_SUBMIT: &str = "submit_work_items";

async fn resolve_operation(ctx_data: ContextData<RerouteCtxData>) -> RelayResult<PipelineControl> {
  let (api, id) = ctx_data.with(|d| (d.api.clone(), d.operation_id().to_string()));
  info!(bulk_operation_id = %id, "Fetching bulk operation details.");

  let operation = resolve_bulk_operation(api.as_ref(), &id)
    .await?
    .ok_or(RelayError::OperationNotFound { id })?;
  ctx_data.write().operation = Some(operation);
  Ok(PipelineControl::Continue)
}

async fn check_query_family(ctx_data: ContextData<RerouteCtxData>) -> RelayResult<PipelineControl> {
  let mut guard = ctx_data.write();
  let matches = guard
    .operation
    .as_ref()
    .is_some_and(|op| op.query_starts_with(&guard.settings.query_marker));
  if matches {
    return Ok(PipelineControl::Continue);
  }
  info!(marker = %guard.settings.query_marker, "Skipping bulk operation, query family does not match.");
  guard.message = Some(MSG_WRONG_QUERY.to_string());
  Ok(PipelineControl::Stop)
}

async fn check_completion(ctx_data: ContextData<RerouteCtxData>) -> RelayResult<PipelineControl> {
  let mut guard = ctx_data.write();
  let status = match &guard.operation {
    Some(op) if op.is_completed() => return Ok(PipelineControl::Continue),
    Some(op) => op.status.clone(),
    None => return Err(RelayError::OperationNotFound { id: guard.operation_id().to_string() }),
  };
  info!(?status, "Bulk operation not completed yet.");
  guard.message = Some(MSG_NOT_COMPLETED.to_string());
  Ok(PipelineControl::Stop)
}

async fn download_results(ctx_data: ContextData<RerouteCtxData>) -> RelayResult<PipelineControl> {
  let (files, url) = {
    let guard = ctx_data.read();
    let url = guard
      .operation
      .as_ref()
      .and_then(|op| op.result_url())
      .map(str::to_string)
      .ok_or_else(|| RelayError::MissingResultUrl {
        id: guard.operation_id().to_string(),
      })?;
    (guard.files.clone(), url)
  };

  info!(%url, "Downloading JSONL result file.");
  let text = files.fetch(&url).await?;
  let records = parse_jsonl(&text);
  info!(records = records.len(), bytes = text.len(), "Result file parsed.");

  let mut guard = ctx_data.write();
  guard.records_downloaded = Some(records.len());
  guard.records = records;
  Ok(PipelineControl::Continue)
}

async fn extract_items(ctx_data: ContextData<RerouteCtxData>) -> RelayResult<PipelineControl> {
  let mut guard = ctx_data.write();
  let records = std::mem::take(&mut guard.records);
  let items = extract_work_items(&records, &guard.settings.extract_rule);
  info!(
    matched = items.len(),
    total = records.len(),
    "Extracted fulfillment orders from result records."
  );
  let empty = items.is_empty();
  guard.work_items = items;
  if empty {
    guard.message = Some(MSG_NOTHING_TO_PROCESS.to_string());
    return Ok(PipelineControl::Stop);
  }
  Ok(PipelineControl::Continue)
}

async fn submit_items(ctx_data: ContextData<RerouteCtxData>) -> RelayResult<PipelineControl> {
  let (api, settings, items) = ctx_data.with(|d| (d.api.clone(), d.settings.clone(), d.work_items.clone()));
  let report = submit_work_items(api.as_ref(), &items, &settings.strategy, &settings.locations).await;
  if !report.is_success() {
    warn!(errors = report.errors.len(), "Reroute submission reported errors.");
  }
  ctx_data.write().report = Some(report);
  Ok(PipelineControl::Continue)
}

/// Processes bulk-operation-finished notifications.
pub struct BulkOperationWebhook {
  api: Arc<dyn AdminGraphql>,
  files: Arc<dyn ResultFileSource>,
  settings: Arc<RelaySettings>,
  pipeline: Pipeline<RerouteCtxData, RelayError>,
}

impl BulkOperationWebhook {
  pub fn new(api: Arc<dyn AdminGraphql>, files: Arc<dyn ResultFileSource>, settings: RelaySettings) -> Self {
    Self {
      api,
      files,
      settings: Arc::new(settings),
      pipeline: build_pipeline(),
    }
  }

  pub fn settings(&self) -> &RelaySettings {
    &self.settings
  }

  /// Validates the payload, then processes it.
  pub async fn handle_payload(&self, payload: &JsonValue) -> (OutcomeStatus, ProcessingOutcome) {
    match BulkOperationNotification::from_payload(payload) {
      Ok(notification) => {
        let outcome = self.process(notification).await;
        (outcome.status(), outcome)
      }
      Err(e) => {
        warn!(error = %e, "Rejecting webhook payload.");
        (OutcomeStatus::BadRequest, ProcessingOutcome::failed(None, &e))
      }
    }
  }

  /// Runs the pipeline for one notification. Never fails: errors become a
  /// `success: false` outcome carrying the operation id.
  #[instrument(skip_all, fields(bulk_operation_id = %notification.admin_graphql_api_id))]
  pub async fn process(&self, notification: BulkOperationNotification) -> ProcessingOutcome {
    let id = notification.admin_graphql_api_id.clone();
    let ctx_data = ContextData::new(RerouteCtxData {
      api: self.api.clone(),
      files: self.files.clone(),
      settings: self.settings.clone(),
      notification,
      operation: None,
      records: Vec::new(),
      records_downloaded: None,
      work_items: Vec::new(),
      report: None,
      message: None,
    });

    match self.pipeline.run(ctx_data.clone()).await {
      Ok(result) => {
        let outcome = ctx_data.with(RerouteCtxData::outcome);
        info!(
          stopped_early = result == PipelineResult::Stopped,
          success = outcome.success,
          processed = ?outcome.processed,
          "Bulk operation webhook processed."
        );
        outcome
      }
      Err(e) => {
        error!(error = %e, "Error processing bulk operation webhook.");
        ProcessingOutcome::failed(Some(id), &e)
      }
    }
  }
}

fn build_pipeline() -> Pipeline<RerouteCtxData, RelayError> {
  let mut p = Pipeline::<RerouteCtxData, RelayError>::new(&[
    (STEP_RESOLVE, false, None),
    (STEP_QUERY_FAMILY, false, None),
    (STEP_COMPLETION, false, None),
    (STEP_DOWNLOAD, false, None),
    (STEP_EXTRACT, false, None),
    (STEP_SUBMIT, false, None),
  ]);
  p.on_root(STEP_RESOLVE, resolve_operation);
  p.on_root(STEP_QUERY_FAMILY, check_query_family);
  p.on_root(STEP_COMPLETION, check_completion);
  p.on_root(STEP_DOWNLOAD, download_results);
  p.on_root(STEP_EXTRACT, extract_items);
  p.on_root(STEP_SUBMIT, submit_items);
  p
}
