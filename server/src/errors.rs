// bulk_reroute_server/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use bulk_reroute::RelayError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Invalid Payload: {0}")]
  InvalidPayload(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Relay Error: {source}")]
  Relay { source: RelayError },
}

impl From<RelayError> for AppError {
  fn from(err: RelayError) -> Self {
    match err {
      RelayError::Configuration(m) => AppError::Config(m),
      RelayError::InvalidPayload(m) => AppError::InvalidPayload(m),
      source => AppError::Relay { source },
    }
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::InvalidPayload(m) => HttpResponse::BadRequest().json(json!({"success": false, "error": m})),
      AppError::Config(m) => HttpResponse::InternalServerError().json(json!({
        "success": false,
        "error": "Configuration issue",
        "detail": m
      })),
      AppError::Relay { source } => HttpResponse::InternalServerError().json(json!({
        "success": false,
        "error": "Webhook processing error",
        "detail": source.to_string()
      })),
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
