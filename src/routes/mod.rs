// Route exports
pub mod catalog;
pub mod matches;
pub mod profiles;

use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse, Responder};
use std::sync::Arc;

use crate::models::{ErrorResponse, HealthResponse};
use crate::services::{CacheManager, PostgresClient, PostgresError};

/// Application state shared by the catalog and profile handlers
///
/// Matching handlers take `web::Data<MatchService>` instead, so they can be
/// mounted without a database or cache.
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub cache: Arc<CacheManager>,
    pub request_ttl_hours: i64,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .configure(matches::configure)
            .configure(catalog::configure)
            .configure(profiles::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);
    let status = if pg_healthy { "healthy" } else { "degraded" };

    tracing::debug!("Health check: {} (cache: {:?})", status, state.cache.stats());

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// JSON error raised by the payload extractors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

pub(crate) fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new("validation_failed", errors.to_string(), 400))
}

/// Map a storage error onto a response, logging the unexpected ones
pub(crate) fn storage_error(context: &str, err: &PostgresError) -> HttpResponse {
    match err {
        PostgresError::NotFound(what) => {
            HttpResponse::NotFound().json(ErrorResponse::new("not_found", format!("{} not found", what), 404))
        }
        PostgresError::InvalidInput(message) => {
            HttpResponse::BadRequest().json(ErrorResponse::new("invalid_input", message.clone(), 400))
        }
        _ => {
            tracing::error!("{}: {}", context, err);
            HttpResponse::InternalServerError().json(ErrorResponse::new(context, err.to_string(), 500))
        }
    }
}
