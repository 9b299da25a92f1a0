use actix_web::{web, HttpResponse, Responder};

use crate::models::{ErrorResponse, MatchListQuery, MatchListResponse, MatchMastersQuery, MatchMastersResponse};
use crate::services::{MatchError, MatchService};

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/matchMasters", web::post().to(match_masters))
        .route("/matches", web::get().to(list_matches));
}

/// Run the matcher for a request
///
/// POST /api/v1/matchMasters?serviceId={serviceId}&requestId={requestId}
///
/// Response:
/// ```json
/// { "message": "SUCCESS", "matchedCount": 3, "batchId": "uuid" }
/// ```
async fn match_masters(
    service: web::Data<MatchService>,
    query: web::Query<MatchMastersQuery>,
) -> impl Responder {
    let MatchMastersQuery { service_id, request_id } = query.into_inner();

    tracing::info!("Matching masters for request {} (service {})", request_id, service_id);

    match service.match_masters(service_id, request_id).await {
        Ok(outcome) => HttpResponse::Ok().json(MatchMastersResponse {
            message: "SUCCESS".to_string(),
            matched_count: outcome.matched_count,
            batch_id: outcome.batch_id,
        }),
        Err(e) => match_error_response(&e),
    }
}

/// List stored matches for a request
///
/// GET /api/v1/matches?requestId={requestId}
async fn list_matches(
    service: web::Data<MatchService>,
    query: web::Query<MatchListQuery>,
) -> impl Responder {
    let request_id = query.request_id;

    match service.list_matches(request_id).await {
        Ok(matches) => HttpResponse::Ok().json(MatchListResponse {
            request_id,
            count: matches.len(),
            matches,
        }),
        Err(e) => match_error_response(&e),
    }
}

fn match_error_response(err: &MatchError) -> HttpResponse {
    match err {
        MatchError::ServiceNotFound(_) => {
            HttpResponse::NotFound().json(ErrorResponse::new("service_not_found", err.to_string(), 404))
        }
        MatchError::RequestNotFound(_) => {
            HttpResponse::NotFound().json(ErrorResponse::new("request_not_found", err.to_string(), 404))
        }
        MatchError::Storage(e) => {
            tracing::error!("Matching failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new("matching_failed", e.to_string(), 500))
        }
    }
}
