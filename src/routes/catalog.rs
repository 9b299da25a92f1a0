use actix_web::{web, HttpResponse, Responder};
use chrono::{DateTime, Duration, Utc};
use validator::Validate;

use crate::models::{
    CreateServiceRequest, CreateServiceRequestResponse, ErrorResponse, ListResponse, NewServiceRequest,
    ServiceDetailQuery, ServiceListQuery, ServiceListResponse,
};
use crate::routes::{storage_error, validation_error, AppState};
use crate::services::{AuthenticatedUser, CacheKey};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/services")
            .route("/categories", web::get().to(list_categories))
            .route("/services", web::get().to(list_services))
            .route("/details", web::get().to(service_detail))
            .route("/regions", web::get().to(list_regions))
            .route("/questions", web::get().to(list_questions))
            .route("/genders", web::get().to(list_genders))
            .route("/requests", web::post().to(create_request)),
    );
}

/// GET /api/v1/services/categories
async fn list_categories(state: web::Data<AppState>) -> impl Responder {
    let postgres = state.postgres.clone();
    let result = state
        .cache
        .get_or_load(&CacheKey::categories(), || async move { postgres.list_categories().await })
        .await;

    match result {
        Ok(categories) => HttpResponse::Ok().json(ListResponse::from(categories)),
        Err(e) => storage_error("categories_unavailable", &e),
    }
}

/// GET /api/v1/services/services?catCd={categoryId}
async fn list_services(state: web::Data<AppState>, query: web::Query<ServiceListQuery>) -> impl Responder {
    let category_id = query.category_id;

    let category = match state.postgres.find_category(category_id).await {
        Ok(Some(category)) => category,
        Ok(None) => {
            return HttpResponse::NotFound().json(ErrorResponse::new(
                "category_not_found",
                format!("Category {} does not exist", category_id),
                404,
            ));
        }
        Err(e) => return storage_error("services_unavailable", &e),
    };

    let postgres = state.postgres.clone();
    let result = state
        .cache
        .get_or_load(&CacheKey::services(category_id), || async move {
            postgres.list_services(category_id).await
        })
        .await;

    match result {
        Ok(services) => HttpResponse::Ok().json(ServiceListResponse {
            category: category.name,
            result: services,
        }),
        Err(e) => storage_error("services_unavailable", &e),
    }
}

/// GET /api/v1/services/details?serviceId={serviceId}
async fn service_detail(state: web::Data<AppState>, query: web::Query<ServiceDetailQuery>) -> impl Responder {
    match state.postgres.service_detail(query.service_id).await {
        Ok(Some(detail)) => HttpResponse::Ok().json(detail),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse::new(
            "service_not_found",
            format!("Service {} does not exist", query.service_id),
            404,
        )),
        Err(e) => storage_error("service_unavailable", &e),
    }
}

/// GET /api/v1/services/regions
async fn list_regions(state: web::Data<AppState>) -> impl Responder {
    let postgres = state.postgres.clone();
    let result = state
        .cache
        .get_or_load(&CacheKey::regions(), || async move { postgres.list_regions().await })
        .await;

    match result {
        Ok(regions) => HttpResponse::Ok().json(ListResponse::from(regions)),
        Err(e) => storage_error("regions_unavailable", &e),
    }
}

/// GET /api/v1/services/questions
async fn list_questions(state: web::Data<AppState>) -> impl Responder {
    let postgres = state.postgres.clone();
    let result = state
        .cache
        .get_or_load(&CacheKey::questions(), || async move { postgres.list_questions().await })
        .await;

    match result {
        Ok(questions) => HttpResponse::Ok().json(ListResponse::from(questions)),
        Err(e) => storage_error("questions_unavailable", &e),
    }
}

/// GET /api/v1/services/genders
async fn list_genders(state: web::Data<AppState>) -> impl Responder {
    let postgres = state.postgres.clone();
    let result = state
        .cache
        .get_or_load(&CacheKey::genders(), || async move { postgres.list_genders().await })
        .await;

    match result {
        Ok(genders) => HttpResponse::Ok().json(ListResponse::from(genders)),
        Err(e) => storage_error("genders_unavailable", &e),
    }
}

/// Create a service request for the authenticated user
///
/// POST /api/v1/services/requests
///
/// Request body:
/// ```json
/// {
///   "serviceId": 3,
///   "subRegionId": 11,
///   "choiceIds": [4, 9],
///   "preferredMasterGenderId": 1,
///   "expiredAt": "2026-10-21T00:00:00Z"
/// }
/// ```
async fn create_request(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<CreateServiceRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for create_request: {:?}", errors);
        return validation_error(errors);
    }

    let expired_at = match resolve_expiry(req.expired_at, Utc::now(), state.request_ttl_hours) {
        Some(expired_at) => expired_at,
        None => {
            return HttpResponse::BadRequest().json(ErrorResponse::new(
                "invalid_expiry",
                "expiredAt must be in the future",
                400,
            ));
        }
    };

    let req = req.into_inner();
    let new = NewServiceRequest {
        user_id: user.user_id,
        service_id: req.service_id,
        sub_region_id: req.sub_region_id,
        preferred_master_gender_id: req.preferred_master_gender_id,
        choice_ids: req.choice_ids,
        expired_at,
    };

    match state.postgres.create_request(&new).await {
        Ok(request_id) => {
            tracing::info!("User {} created request {} for service {}", user.user_id, request_id, new.service_id);
            HttpResponse::Created().json(CreateServiceRequestResponse { request_id, expired_at })
        }
        Err(e) => storage_error("request_creation_failed", &e),
    }
}

/// Expiry for a new request: the requested instant, or `now` plus the TTL.
/// `None` when the result is not strictly after `now`.
pub(crate) fn resolve_expiry(
    requested: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    ttl_hours: i64,
) -> Option<DateTime<Utc>> {
    let expired_at = match requested {
        Some(expired_at) => expired_at,
        None => now.checked_add_signed(Duration::try_hours(ttl_hours)?)?,
    };

    (expired_at > now).then_some(expired_at)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_defaults_to_ttl() {
        let now = Utc::now();
        assert_eq!(resolve_expiry(None, now, 48), Some(now + Duration::hours(48)));
    }

    #[test]
    fn test_future_expiry_is_kept() {
        let now = Utc::now();
        let requested = now + Duration::minutes(1);
        assert_eq!(resolve_expiry(Some(requested), now, 48), Some(requested));
    }

    #[test]
    fn test_past_or_current_expiry_is_rejected() {
        let now = Utc::now();
        assert_eq!(resolve_expiry(Some(now), now, 48), None);
        assert_eq!(resolve_expiry(Some(now - Duration::hours(1)), now, 48), None);
    }

    #[test]
    fn test_unusable_ttl_is_rejected() {
        let now = Utc::now();
        assert_eq!(resolve_expiry(None, now, 0), None);
        assert_eq!(resolve_expiry(None, now, -1), None);
        assert_eq!(resolve_expiry(None, now, i64::MAX), None);
    }
}
