// bulk_reroute_server/src/web/routes.rs

use crate::web::handlers::webhook_handlers;
use actix_web::web;

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Called from `main.rs` and the handler tests to mount the app's services.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/health", web::get().to(health_check_handler))
    .service(
      web::resource("/webhooks")
        .route(web::post().to(webhook_handlers::bulk_operation_finish_handler))
        .route(web::get().to(webhook_handlers::webhook_liveness_handler)),
    );
}
