use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{
    ErrorResponse, MessageResponse, ProfileListQuery, ProfileListResponse, UpdateDescriptionRequest,
    UpdateIntroductionRequest, UpdateMainServiceRequest,
};
use crate::routes::{storage_error, validation_error, AppState};
use crate::services::AuthenticatedUser;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("/profile", web::get().to(list_profiles))
            .route("/profile/{master_id}", web::get().to(profile_detail))
            .route("/profile_main_service", web::post().to(update_main_service))
            .route("/profile_introduction", web::post().to(update_introduction))
            .route("/profile_description", web::post().to(update_description)),
    );
}

/// GET /api/v1/users/profile?serviceId={serviceId}&limit=20&offset=0
async fn list_profiles(state: web::Data<AppState>, query: web::Query<ProfileListQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    match state
        .postgres
        .list_masters(query.service_id, query.limit, query.offset)
        .await
    {
        Ok(masters) => HttpResponse::Ok().json(ProfileListResponse {
            masters,
            limit: query.limit,
            offset: query.offset,
        }),
        Err(e) => storage_error("profiles_unavailable", &e),
    }
}

/// GET /api/v1/users/profile/{master_id}
async fn profile_detail(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let master_id = path.into_inner();

    match state.postgres.master_profile(master_id).await {
        Ok(Some(profile)) => HttpResponse::Ok().json(profile),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse::new(
            "master_not_found",
            format!("Master {} does not exist", master_id),
            404,
        )),
        Err(e) => storage_error("profile_unavailable", &e),
    }
}

/// Resolve the caller's master id, or the response to return instead
async fn caller_master_id(state: &AppState, user: &AuthenticatedUser) -> Result<i64, HttpResponse> {
    match state.postgres.find_master_id(user.user_id).await {
        Ok(Some(master_id)) => Ok(master_id),
        Ok(None) => Err(HttpResponse::Forbidden().json(ErrorResponse::new(
            "not_a_master",
            format!("User {} has no master profile", user.user_id),
            403,
        ))),
        Err(e) => Err(storage_error("profile_unavailable", &e)),
    }
}

/// POST /api/v1/users/profile_main_service
async fn update_main_service(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<UpdateMainServiceRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let master_id = match caller_master_id(&state, &user).await {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.postgres.set_main_service(master_id, req.service_id).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::success()),
        Err(e) => storage_error("profile_update_failed", &e),
    }
}

/// POST /api/v1/users/profile_introduction
async fn update_introduction(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<UpdateIntroductionRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let master_id = match caller_master_id(&state, &user).await {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.postgres.update_introduction(master_id, &req.introduction).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::success()),
        Err(e) => storage_error("profile_update_failed", &e),
    }
}

/// POST /api/v1/users/profile_description
async fn update_description(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<UpdateDescriptionRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let master_id = match caller_master_id(&state, &user).await {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.postgres.update_description(master_id, &req.description).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::success()),
        Err(e) => storage_error("profile_update_failed", &e),
    }
}
