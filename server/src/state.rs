// bulk_reroute_server/src/state.rs
use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use bulk_reroute::BulkOperationWebhook;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub config: Arc<AppConfig>,
  /// Absent when the admin API credentials are not configured.
  pub relay: Option<Arc<BulkOperationWebhook>>,
}

impl AppState {
  /// The webhook processor, or the configuration error explaining why there is none.
  pub fn relay(&self) -> Result<&BulkOperationWebhook> {
    match &self.relay {
      Some(relay) => Ok(relay.as_ref()),
      None => match self.config.credentials() {
        Err(e) => Err(e),
        Ok(_) => Err(AppError::Config("webhook processor was not initialised".to_string())),
      },
    }
  }
}
