use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query for running the matcher
///
/// Both identifiers are required; a missing one is rejected by the query extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchMastersQuery {
    #[serde(rename = "serviceId")]
    pub service_id: i64,
    #[serde(rename = "requestId")]
    pub request_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchListQuery {
    #[serde(rename = "requestId")]
    pub request_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceListQuery {
    #[serde(rename = "catCd")]
    pub category_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDetailQuery {
    #[serde(rename = "serviceId")]
    pub service_id: i64,
}

/// Request body for creating a service request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    #[validate(range(min = 1))]
    pub service_id: i64,
    #[validate(range(min = 1))]
    pub sub_region_id: i64,
    #[serde(default)]
    pub choice_ids: Vec<i64>,
    #[validate(range(min = 1))]
    pub preferred_master_gender_id: Option<i64>,
    /// Defaults to now plus the configured request TTL
    pub expired_at: Option<DateTime<Utc>>,
}

/// Query for listing master profiles
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProfileListQuery {
    #[serde(rename = "serviceId")]
    pub service_id: Option<i64>,
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateMainServiceRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "service_id", rename = "serviceId")]
    pub service_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateIntroductionRequest {
    #[validate(length(min = 1, max = 100))]
    pub introduction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateDescriptionRequest {
    #[validate(length(max = 5000))]
    pub description: String,
}
