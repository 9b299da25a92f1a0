use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::models::domain::{MatchRecord, MasterSummary, Service};

/// Response for the match endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchMastersResponse {
    pub message: String,
    #[serde(rename = "matchedCount")]
    pub matched_count: usize,
    #[serde(rename = "batchId")]
    pub batch_id: Uuid,
}

/// Persisted matches for one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchListResponse {
    #[serde(rename = "requestId")]
    pub request_id: i64,
    pub matches: Vec<MatchRecord>,
    pub count: usize,
}

/// Generic list wrapper for catalog lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub result: Vec<T>,
    pub count: usize,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(result: Vec<T>) -> Self {
        let count = result.len();
        Self { result, count }
    }
}

/// Services belonging to one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceListResponse {
    pub category: String,
    pub result: Vec<Service>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServiceRequestResponse {
    #[serde(rename = "requestId")]
    pub request_id: i64,
    #[serde(rename = "expiredAt")]
    pub expired_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileListResponse {
    pub masters: Vec<MasterSummary>,
    pub limit: i64,
    pub offset: i64,
}

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn success() -> Self {
        Self { message: "SUCCESS".to_string() }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(error: &str, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            status_code,
        }
    }
}
