// bulk_reroute_server/src/main.rs

mod config;
mod errors;
mod state;
mod web;

use crate::config::AppConfig;
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use bulk_reroute::{
  ensure_webhook_subscription, AdminClient, BulkOperationWebhook, HttpResultFiles, InMemorySubscriptionStore,
};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

/// Points the bulk-finish subscription at this service. Failures are logged
/// and otherwise ignored; the server serves webhooks either way.
async fn ensure_subscription(client: &AdminClient, config: &AppConfig) {
  let Some(callback_url) = config.webhook_callback_url.as_deref() else {
    tracing::info!("WEBHOOK_CALLBACK_URL not set, skipping webhook subscription check.");
    return;
  };
  let store = InMemorySubscriptionStore::new(config.webhook_subscription_id.clone());
  match ensure_webhook_subscription(client, &store, callback_url).await {
    Ok(subscription) => tracing::info!(
      subscription_id = %subscription.id,
      "Webhook subscription ready. Set SHOPIFY_WEBHOOK_SUBSCRIPTION_ID to this id to skip the topic search."
    ),
    Err(e) => tracing::error!(error = %e, "Failed to ensure webhook subscription."),
  }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting bulk reroute webhook server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };

  let relay = match app_config.credentials() {
    Ok(credentials) => {
      let client = AdminClient::new(&credentials);
      tracing::info!(endpoint = %client.endpoint(), "Admin API client configured.");
      ensure_subscription(&client, &app_config).await;
      Some(Arc::new(BulkOperationWebhook::new(
        Arc::new(client),
        Arc::new(HttpResultFiles::new()),
        app_config.relay_settings(),
      )))
    }
    Err(e) => {
      tracing::warn!(error = %e, "Admin API credentials missing; webhooks will be rejected until configured.");
      None
    }
  };

  let app_state = AppState {
    config: app_config.clone(),
    relay,
  };

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
