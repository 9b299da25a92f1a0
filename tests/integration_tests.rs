// Integration tests for Bestgo matching over an in-memory repository

use actix_web::{test, web, App};
use async_trait::async_trait;
use bestgo::core::Matcher;
use bestgo::models::{Candidate, MatchRecord, ScoredCandidate, ServiceRequest};
use bestgo::routes::{handle_query_payload_error, matches};
use bestgo::services::{MatchError, MatchRepository, MatchService, PostgresError};
use chrono::{Duration, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const LESSON_SERVICE: i64 = 3;
const EMPTY_SERVICE: i64 = 4;
const CLEANING_SERVICE: i64 = 5;
const REQUEST_ID: i64 = 10;
const EMPTY_REQUEST_ID: i64 = 20;
const MALE: i64 = 1;
const FEMALE: i64 = 2;

#[derive(Default)]
struct InMemoryRepository {
    services: Vec<i64>,
    requests: HashMap<i64, ServiceRequest>,
    offerings: HashMap<i64, Vec<Candidate>>,
    records: Mutex<Vec<MatchRecord>>,
}

impl InMemoryRepository {
    fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl MatchRepository for InMemoryRepository {
    async fn service_exists(&self, service_id: i64) -> Result<bool, PostgresError> {
        Ok(self.services.contains(&service_id))
    }

    async fn find_request(&self, request_id: i64) -> Result<Option<ServiceRequest>, PostgresError> {
        Ok(self.requests.get(&request_id).cloned())
    }

    async fn list_offerings(&self, service_id: i64) -> Result<Vec<Candidate>, PostgresError> {
        Ok(self.offerings.get(&service_id).cloned().unwrap_or_default())
    }

    async fn insert_matches(
        &self,
        request_id: i64,
        batch_id: Uuid,
        scored: &[ScoredCandidate],
    ) -> Result<Vec<MatchRecord>, PostgresError> {
        let mut records = self.records.lock().unwrap();
        let mut inserted = Vec::new();

        for entry in scored {
            let record = MatchRecord {
                id: records.len() as i64 + 1,
                request_id,
                master_id: entry.candidate.master_id,
                master_service_id: entry.candidate.offering_id,
                priority: entry.priority as i32,
                batch_id,
                created_at: Utc::now(),
            };
            records.push(record.clone());
            inserted.push(record);
        }

        Ok(inserted)
    }

    async fn list_matches(&self, request_id: i64) -> Result<Vec<MatchRecord>, PostgresError> {
        let mut matches: Vec<MatchRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.request_id == request_id)
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.priority.cmp(&a.priority));
        Ok(matches)
    }
}

fn create_request() -> ServiceRequest {
    create_request_for(REQUEST_ID, LESSON_SERVICE)
}

fn create_request_for(id: i64, service_id: i64) -> ServiceRequest {
    ServiceRequest {
        id,
        user_id: 1,
        service_id,
        sub_region_id: 101, // Gwangjin
        region_id: 1,       // Seoul
        preferred_master_gender_id: Some(MALE),
        expired_at: Utc::now() + Duration::hours(24),
        created_at: Utc::now(),
    }
}

fn create_repository() -> Arc<InMemoryRepository> {
    let offerings = vec![
        Candidate { offering_id: 1, master_id: 11, sub_region_id: 101, region_id: 1, is_main: true, gender_id: Some(MALE) },
        Candidate { offering_id: 2, master_id: 12, sub_region_id: 201, region_id: 2, is_main: false, gender_id: Some(FEMALE) },
        Candidate { offering_id: 3, master_id: 13, sub_region_id: 102, region_id: 1, is_main: false, gender_id: None },
    ];

    // Would score the maximum against request 10 if services were not checked
    let cleaning = vec![
        Candidate { offering_id: 50, master_id: 77, sub_region_id: 101, region_id: 1, is_main: true, gender_id: Some(MALE) },
    ];

    let mut repository = InMemoryRepository {
        services: vec![LESSON_SERVICE, EMPTY_SERVICE, CLEANING_SERVICE],
        ..Default::default()
    };
    repository.requests.insert(REQUEST_ID, create_request());
    repository
        .requests
        .insert(EMPTY_REQUEST_ID, create_request_for(EMPTY_REQUEST_ID, EMPTY_SERVICE));
    repository.offerings.insert(LESSON_SERVICE, offerings);
    repository.offerings.insert(CLEANING_SERVICE, cleaning);

    Arc::new(repository)
}

fn create_service(repository: Arc<InMemoryRepository>) -> MatchService {
    MatchService::new(repository, Matcher::with_default_weights())
}

#[tokio::test]
async fn test_match_masters_scores_all_candidates() {
    let repository = create_repository();
    let service = create_service(repository.clone());

    let outcome = service.match_masters(LESSON_SERVICE, REQUEST_ID).await.unwrap();

    assert_eq!(outcome.matched_count, 3);
    assert_eq!(repository.record_count(), 3);

    let priority_of = |master_id: i64| {
        outcome
            .records
            .iter()
            .find(|r| r.master_id == master_id)
            .map(|r| r.priority)
            .unwrap()
    };
    assert_eq!(priority_of(11), 5);
    assert_eq!(priority_of(12), 0);
    assert_eq!(priority_of(13), 1);
    assert!(outcome.records.iter().all(|r| r.batch_id == outcome.batch_id));
}

#[tokio::test]
async fn test_rematching_appends_new_batch() {
    let repository = create_repository();
    let service = create_service(repository.clone());

    let first = service.match_masters(LESSON_SERVICE, REQUEST_ID).await.unwrap();
    let second = service.match_masters(LESSON_SERVICE, REQUEST_ID).await.unwrap();

    assert_eq!(repository.record_count(), first.matched_count * 2);
    assert_ne!(first.batch_id, second.batch_id);

    let stored = service.list_matches(REQUEST_ID).await.unwrap();
    assert_eq!(stored.len(), 6);
}

#[tokio::test]
async fn test_missing_service_is_not_found() {
    let service = create_service(create_repository());

    let err = service.match_masters(999, REQUEST_ID).await.unwrap_err();
    assert!(matches!(err, MatchError::ServiceNotFound(999)));
}

#[tokio::test]
async fn test_missing_request_is_not_found() {
    let service = create_service(create_repository());

    let err = service.match_masters(LESSON_SERVICE, 999).await.unwrap_err();
    assert!(matches!(err, MatchError::RequestNotFound(999)));
}

#[tokio::test]
async fn test_empty_candidate_set_succeeds_with_zero() {
    let repository = create_repository();
    let service = create_service(repository.clone());

    let outcome = service.match_masters(EMPTY_SERVICE, EMPTY_REQUEST_ID).await.unwrap();

    assert_eq!(outcome.matched_count, 0);
    assert!(outcome.records.is_empty());
    assert_eq!(repository.record_count(), 0);
}

#[tokio::test]
async fn test_request_for_other_service_is_not_found() {
    let repository = create_repository();
    let service = create_service(repository.clone());

    let err = service.match_masters(CLEANING_SERVICE, REQUEST_ID).await.unwrap_err();

    assert!(matches!(err, MatchError::RequestNotFound(REQUEST_ID)));
    assert_eq!(repository.record_count(), 0);
    assert!(service.list_matches(REQUEST_ID).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_match_masters_route() {
    let service = create_service(create_repository());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .service(web::scope("/api/v1").configure(matches::configure)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/matchMasters?serviceId=3&requestId=10")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "SUCCESS");
    assert_eq!(body["matchedCount"], 3);
    assert!(body["batchId"].is_string());

    let req = test::TestRequest::get().uri("/api/v1/matches?requestId=10").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 3);
    assert_eq!(body["matches"][0]["priority"], 5);
}

#[actix_web::test]
async fn test_match_masters_route_errors() {
    let service = create_service(create_repository());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .service(web::scope("/api/v1").configure(matches::configure)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/matchMasters?serviceId=999&requestId=10")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "service_not_found");

    let req = test::TestRequest::post()
        .uri("/api/v1/matchMasters?serviceId=3&requestId=999")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "request_not_found");

    let req = test::TestRequest::post()
        .uri("/api/v1/matchMasters?serviceId=3")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_query");
}
