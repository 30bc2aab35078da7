// bulk_reroute_server/src/config.rs

use crate::errors::{AppError, Result};
use bulk_reroute::settings::DEFAULT_QUERY_MARKER;
use bulk_reroute::submit::DEFAULT_FLOW_TRIGGER_HANDLE;
use bulk_reroute::{parse_id_list, AdminCredentials, LocationFilter, RelaySettings, RerouteStrategy};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,

  // Admin API access. Both are needed to process webhooks; the server still
  // starts without them and reports the gap on every request.
  pub shop_domain: Option<String>,
  pub admin_api_token: Option<String>,
  pub api_version: Option<String>,

  pub included_location_ids: Vec<String>,
  pub excluded_location_ids: Vec<String>,
  pub strategy: RerouteStrategy,
  pub query_marker: String,

  // Subscription upkeep at startup
  pub webhook_callback_url: Option<String>,
  pub webhook_subscription_id: Option<String>,
}

fn optional_env(var_name: &str) -> Option<String> {
  env::var(var_name).ok().filter(|v| !v.trim().is_empty())
}

/// `batch` (default) or `flow`.
pub fn parse_strategy(raw: Option<&str>, flow_handle: Option<String>) -> Result<RerouteStrategy> {
  match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
    None | Some("") | Some("batch") => Ok(RerouteStrategy::Batch),
    Some("flow") => Ok(RerouteStrategy::FlowTrigger {
      handle: flow_handle.unwrap_or_else(|| DEFAULT_FLOW_TRIGGER_HANDLE.to_string()),
    }),
    Some(other) => Err(AppError::Config(format!(
      "Invalid REROUTE_STRATEGY '{}': expected 'batch' or 'flow'",
      other
    ))),
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let server_host = optional_env("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = optional_env("SERVER_PORT")
      .unwrap_or_else(|| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;

    let strategy = parse_strategy(
      optional_env("REROUTE_STRATEGY").as_deref(),
      optional_env("FLOW_TRIGGER_HANDLE"),
    )?;

    let config = Self {
      server_host,
      server_port,
      shop_domain: optional_env("SHOP_DOMAIN"),
      admin_api_token: optional_env("ADMIN_API_TOKEN"),
      api_version: optional_env("API_VERSION"),
      included_location_ids: optional_env("INCLUDED_LOCATION_IDS")
        .map(|raw| parse_id_list(&raw))
        .unwrap_or_default(),
      excluded_location_ids: optional_env("EXCLUDED_LOCATION_IDS")
        .map(|raw| parse_id_list(&raw))
        .unwrap_or_default(),
      strategy,
      query_marker: optional_env("BULK_QUERY_MARKER").unwrap_or_else(|| DEFAULT_QUERY_MARKER.to_string()),
      webhook_callback_url: optional_env("WEBHOOK_CALLBACK_URL"),
      webhook_subscription_id: optional_env("SHOPIFY_WEBHOOK_SUBSCRIPTION_ID"),
    };

    // The access token is never logged.
    tracing::info!(
      shop_domain = ?config.shop_domain,
      api_version = ?config.api_version,
      strategy = ?config.strategy,
      included_locations = config.included_location_ids.len(),
      excluded_locations = config.excluded_location_ids.len(),
      "Application configuration loaded successfully."
    );
    Ok(config)
  }

  /// Admin API credentials, or a configuration error naming what is missing.
  pub fn credentials(&self) -> Result<AdminCredentials> {
    let credentials = AdminCredentials::new(
      self.shop_domain.clone().unwrap_or_default(),
      self.admin_api_token.clone().unwrap_or_default(),
      self.api_version.clone(),
    )?;
    Ok(credentials)
  }

  pub fn relay_settings(&self) -> RelaySettings {
    RelaySettings::new(self.strategy.clone())
      .with_query_marker(self.query_marker.clone())
      .with_locations(LocationFilter {
        included_location_ids: self.included_location_ids.clone(),
        excluded_location_ids: self.excluded_location_ids.clone(),
      })
  }
}
