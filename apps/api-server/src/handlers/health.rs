//! Service identity and health check endpoints.

use actix_web::HttpResponse;

use quill_shared::ApiResponse;
use quill_shared::dto::{HealthResponse, MessageResponse};

/// GET /
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(MessageResponse {
        message: "API Post Service".to_string(),
    }))
}

/// Health check endpoint - returns server status.
///
/// GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    }))
}
