use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::core::Matcher;
use crate::models::{Candidate, MatchRecord, ScoredCandidate, ServiceRequest};
use crate::services::postgres::PostgresError;

/// Errors surfaced by a matching run
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Service {0} does not exist")]
    ServiceNotFound(i64),

    #[error("Request {0} does not exist")]
    RequestNotFound(i64),

    #[error("Storage error: {0}")]
    Storage(#[from] PostgresError),
}

/// Persistence the matcher depends on
#[async_trait]
pub trait MatchRepository: Send + Sync {
    async fn service_exists(&self, service_id: i64) -> Result<bool, PostgresError>;

    /// Load a request together with the region of its sub-region
    async fn find_request(&self, request_id: i64) -> Result<Option<ServiceRequest>, PostgresError>;

    /// Every master offering of the service
    async fn list_offerings(&self, service_id: i64) -> Result<Vec<Candidate>, PostgresError>;

    /// Append one record per scored candidate under the given batch
    async fn insert_matches(
        &self,
        request_id: i64,
        batch_id: Uuid,
        scored: &[ScoredCandidate],
    ) -> Result<Vec<MatchRecord>, PostgresError>;

    async fn list_matches(&self, request_id: i64) -> Result<Vec<MatchRecord>, PostgresError>;
}

/// Outcome of one matching run
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub batch_id: Uuid,
    pub matched_count: usize,
    pub records: Vec<MatchRecord>,
}

/// Resolves a request and its candidates, scores them and stores the results
#[derive(Clone)]
pub struct MatchService {
    repository: Arc<dyn MatchRepository>,
    matcher: Matcher,
}

impl MatchService {
    pub fn new(repository: Arc<dyn MatchRepository>, matcher: Matcher) -> Self {
        Self { repository, matcher }
    }

    /// Match the masters offering `service_id` against request `request_id`
    ///
    /// A request opened for a different service counts as not found.
    /// Each call appends a fresh batch of records; previous batches for the
    /// same request are left untouched. An empty candidate set is a success
    /// with a count of zero.
    pub async fn match_masters(
        &self,
        service_id: i64,
        request_id: i64,
    ) -> Result<MatchOutcome, MatchError> {
        if !self.repository.service_exists(service_id).await? {
            return Err(MatchError::ServiceNotFound(service_id));
        }

        let request = self
            .repository
            .find_request(request_id)
            .await?
            .ok_or(MatchError::RequestNotFound(request_id))?;

        // A request is only matchable against the service it was opened for
        if request.service_id != service_id {
            tracing::info!(
                "Request {} targets service {}, not {}",
                request_id,
                request.service_id,
                service_id
            );
            return Err(MatchError::RequestNotFound(request_id));
        }

        let candidates = self.repository.list_offerings(service_id).await?;
        tracing::debug!(
            "Scoring {} candidates for request {} (service {})",
            candidates.len(),
            request_id,
            service_id
        );

        let result = self.matcher.rank(&request, candidates);

        let batch_id = Uuid::new_v4();
        let records = if result.scored.is_empty() {
            Vec::new()
        } else {
            self.repository
                .insert_matches(request_id, batch_id, &result.scored)
                .await?
        };

        tracing::info!(
            "Matched request {} against {} candidates (batch {})",
            request_id,
            result.total_candidates,
            batch_id
        );

        Ok(MatchOutcome {
            batch_id,
            matched_count: records.len(),
            records,
        })
    }

    /// Stored matches for a request, best first
    pub async fn list_matches(&self, request_id: i64) -> Result<Vec<MatchRecord>, MatchError> {
        if self.repository.find_request(request_id).await?.is_none() {
            return Err(MatchError::RequestNotFound(request_id));
        }

        Ok(self.repository.list_matches(request_id).await?)
    }
}
