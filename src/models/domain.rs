use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user's request for a service, resolved with the parent region of its sub-region
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ServiceRequest {
    pub id: i64,
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "serviceId")]
    pub service_id: i64,
    #[serde(rename = "subRegionId")]
    pub sub_region_id: i64,
    #[serde(rename = "regionId")]
    pub region_id: i64,
    #[serde(rename = "preferredMasterGenderId")]
    pub preferred_master_gender_id: Option<i64>,
    #[serde(rename = "expiredAt")]
    pub expired_at: DateTime<Utc>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// A master's offering of the requested service
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    #[serde(rename = "offeringId")]
    pub offering_id: i64,
    #[serde(rename = "masterId")]
    pub master_id: i64,
    #[serde(rename = "subRegionId")]
    pub sub_region_id: i64,
    #[serde(rename = "regionId")]
    pub region_id: i64,
    #[serde(rename = "isMain")]
    pub is_main: bool,
    #[serde(rename = "genderId")]
    pub gender_id: Option<i64>,
}

/// Which matching criteria a candidate satisfied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCriteria {
    pub same_sub_region: bool,
    pub same_region: bool,
    pub main_service: bool,
    pub preferred_gender: bool,
}

/// Candidate with its computed priority
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub criteria: MatchCriteria,
    pub priority: u32,
}

/// Persisted outcome linking a request to a master
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: i64,
    pub request_id: i64,
    pub master_id: i64,
    pub master_service_id: i64,
    pub priority: i32,
    pub batch_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Points awarded per satisfied criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchWeights {
    pub same_sub_region: u16,
    pub same_region: u16,
    pub main_service: u16,
    pub preferred_gender: u16,
}

impl MatchWeights {
    /// Highest priority a candidate can reach
    pub fn max_priority(&self) -> u32 {
        u32::from(self.same_sub_region)
            + u32::from(self.same_region)
            + u32::from(self.main_service)
            + u32::from(self.preferred_gender)
    }
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            same_sub_region: 2,
            same_region: 1,
            main_service: 1,
            preferred_gender: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    #[serde(rename = "categoryId")]
    pub id: i64,
    pub name: String,
    #[serde(rename = "iconImageUrl")]
    pub icon_image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Service {
    #[serde(rename = "serviceId")]
    pub id: i64,
    #[serde(rename = "categoryId")]
    pub category_id: i64,
    pub name: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

/// Service with aggregate figures over the masters offering it
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetail {
    pub service_id: i64,
    pub name: String,
    pub image_url: String,
    pub category_id: i64,
    pub category_name: String,
    pub master_count: i64,
    pub review_count: i64,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Gender {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    #[serde(rename = "regionId")]
    pub id: i64,
    pub name: String,
    #[serde(rename = "subRegions")]
    pub sub_regions: Vec<SubRegion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubRegion {
    #[serde(rename = "subRegionId")]
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "questionId")]
    pub id: i64,
    pub name: String,
    pub choices: Vec<QuestionChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionChoice {
    #[serde(rename = "choiceId")]
    pub id: i64,
    pub choice: String,
}

/// Row used by the master listing
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MasterSummary {
    pub master_id: i64,
    pub name: String,
    pub profile_image: Option<String>,
    pub introduction: String,
    pub career: Option<i32>,
    pub main_service: Option<String>,
    pub sub_region: String,
    pub region: String,
    pub review_count: i64,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MasterServiceEntry {
    pub service_id: i64,
    pub name: String,
    pub is_main: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub user_name: String,
    pub rating: f64,
    pub image_url: Option<String>,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Full master profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterProfile {
    pub master_id: i64,
    pub name: String,
    pub profile_image: Option<String>,
    pub introduction: String,
    pub description: Option<String>,
    pub birthdate: NaiveDate,
    pub career: Option<i32>,
    pub sub_region: String,
    pub region: String,
    pub services: Vec<MasterServiceEntry>,
    pub reviews: Vec<Review>,
    pub review_count: usize,
    pub average_rating: Option<f64>,
    pub certificates: Vec<String>,
}

/// Master's own row, as read for the profile view
#[derive(Debug, Clone, FromRow)]
pub struct MasterRow {
    pub master_id: i64,
    pub name: String,
    pub profile_image: Option<String>,
    pub introduction: String,
    pub description: Option<String>,
    pub birthdate: NaiveDate,
    pub career: Option<i32>,
    pub sub_region: String,
    pub region: String,
}

/// Inputs for inserting a new service request
#[derive(Debug, Clone)]
pub struct NewServiceRequest {
    pub user_id: i64,
    pub service_id: i64,
    pub sub_region_id: i64,
    pub preferred_master_gender_id: Option<i64>,
    pub choice_ids: Vec<i64>,
    pub expired_at: DateTime<Utc>,
}
