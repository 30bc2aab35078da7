// bulk_reroute_server/src/web/handlers/webhook_handlers.rs

use actix_web::{web, HttpResponse};
use bulk_reroute::OutcomeStatus;
use serde_json::Value as JsonValue;
use tracing::{info, instrument, warn};

use crate::errors::{AppError, Result};
use crate::state::AppState;

/// Receives a bulk-operation-finished notification.
///
/// Configuration is checked before the body is even parsed, so a missing
/// credential never leads to a remote call. The response body is the
/// processing outcome, with 200, 400 or 500 depending on how it went.
#[instrument(name = "handler::bulk_operation_finish", skip(app_state, body), fields(payload_bytes = body.len()))]
pub async fn bulk_operation_finish_handler(app_state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse> {
  let relay = app_state.relay()?;

  let payload: JsonValue = serde_json::from_slice(&body).map_err(|e| {
    warn!(error = %e, "Webhook body is not valid JSON.");
    AppError::InvalidPayload(format!("body is not valid JSON: {}", e))
  })?;

  let (status, outcome) = relay.handle_payload(&payload).await;
  info!(
    status = status.http_status(),
    success = outcome.success,
    bulk_operation_id = ?outcome.bulk_operation_id,
    "Webhook handled."
  );

  let mut response = match status {
    OutcomeStatus::Ok => HttpResponse::Ok(),
    OutcomeStatus::BadRequest => HttpResponse::BadRequest(),
    OutcomeStatus::Failed => HttpResponse::InternalServerError(),
  };
  Ok(response.json(outcome))
}

pub async fn webhook_liveness_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({
    "success": true,
    "message": "Webhook endpoint is active"
  }))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::AppConfig;
  use crate::web::configure_app_routes;
  use actix_web::{http::StatusCode, test, App};
  use async_trait::async_trait;
  use bulk_reroute::settings::DEFAULT_QUERY_MARKER;
  use bulk_reroute::{
    AdminGraphql, BulkOperationWebhook, GraphqlRequest, RelayError, RelayResult, RelaySettings, RerouteStrategy,
    ResultFileSource,
  };
  use parking_lot::Mutex;
  use serde_json::json;
  use std::sync::Arc;

  /// Answers every call with the same bulk operation node.
  struct StubAdmin {
    node: JsonValue,
    calls: Mutex<Vec<&'static str>>,
  }

  impl StubAdmin {
    fn with_operation(status: &str, query: &str) -> Arc<Self> {
      Arc::new(Self {
        node: json!({
          "id": "gid://shopify/BulkOperation/9",
          "status": status,
          "query": query,
          "url": null
        }),
        calls: Mutex::new(Vec::new()),
      })
    }

    fn call_count(&self) -> usize {
      self.calls.lock().len()
    }
  }

  #[async_trait]
  impl AdminGraphql for StubAdmin {
    async fn execute(&self, request: GraphqlRequest) -> RelayResult<JsonValue> {
      self.calls.lock().push(request.operation_name);
      Ok(json!({ "node": self.node.clone() }))
    }
  }

  struct NoFiles;

  #[async_trait]
  impl ResultFileSource for NoFiles {
    async fn fetch(&self, _url: &str) -> RelayResult<String> {
      Err(RelayError::Download {
        status: 404,
        reason: "Not Found".to_string(),
      })
    }
  }

  fn test_config() -> AppConfig {
    AppConfig {
      server_host: "127.0.0.1".to_string(),
      server_port: 0,
      shop_domain: Some("test-shop.myshopify.com".to_string()),
      admin_api_token: Some("shpat_test".to_string()),
      api_version: None,
      included_location_ids: vec![],
      excluded_location_ids: vec![],
      strategy: RerouteStrategy::Batch,
      query_marker: DEFAULT_QUERY_MARKER.to_string(),
      webhook_callback_url: None,
      webhook_subscription_id: None,
    }
  }

  fn state_with(api: Arc<StubAdmin>) -> AppState {
    let relay = BulkOperationWebhook::new(api, Arc::new(NoFiles), RelaySettings::default());
    AppState {
      config: Arc::new(test_config()),
      relay: Some(Arc::new(relay)),
    }
  }

  fn unconfigured_state() -> AppState {
    let mut config = test_config();
    config.admin_api_token = None;
    AppState {
      config: Arc::new(config),
      relay: None,
    }
  }

  #[actix_web::test]
  async fn liveness_and_health() {
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(unconfigured_state()))
        .configure(configure_app_routes),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/webhooks").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: JsonValue = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "success": true, "message": "Webhook endpoint is active" }));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[actix_web::test]
  async fn missing_credentials_is_500() {
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(unconfigured_state()))
        .configure(configure_app_routes),
    )
    .await;

    let req = test::TestRequest::post()
      .uri("/webhooks")
      .set_json(json!({ "admin_graphql_api_id": "gid://shopify/BulkOperation/9" }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: JsonValue = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Configuration issue"));
  }

  #[actix_web::test]
  async fn malformed_payloads_are_400_without_remote_calls() {
    let api = StubAdmin::with_operation("COMPLETED", DEFAULT_QUERY_MARKER);
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(state_with(api.clone())))
        .configure(configure_app_routes),
    )
    .await;

    let req = test::TestRequest::post()
      .uri("/webhooks")
      .insert_header(("content-type", "application/json"))
      .set_payload("{not json")
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
      .uri("/webhooks")
      .set_json(json!({ "id": 1 }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: JsonValue = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));

    assert_eq!(api.call_count(), 0);
  }

  #[actix_web::test]
  async fn outcome_status_maps_to_http_status() {
    let skipped = StubAdmin::with_operation("COMPLETED", "query SomethingElse { shop { id } }");
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(state_with(skipped.clone())))
        .configure(configure_app_routes),
    )
    .await;
    let req = test::TestRequest::post()
      .uri("/webhooks")
      .set_json(json!({ "admin_graphql_api_id": "gid://shopify/BulkOperation/9" }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: JsonValue = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Bulk operation skipped - wrong query type"));
    assert_eq!(skipped.call_count(), 1);

    // Completed but without a result file location.
    let broken = StubAdmin::with_operation("COMPLETED", "query GetOrdersToRelease { orders { id } }");
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(state_with(broken)))
        .configure(configure_app_routes),
    )
    .await;
    let req = test::TestRequest::post()
      .uri("/webhooks")
      .set_json(json!({ "admin_graphql_api_id": "gid://shopify/BulkOperation/9" }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: JsonValue = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["bulkOperationId"], json!("gid://shopify/BulkOperation/9"));
  }
}
