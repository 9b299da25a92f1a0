use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::collections::BTreeSet;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Candidate, MatchRecord, NewServiceRequest, ScoredCandidate, ServiceRequest};
use crate::services::matching::MatchRepository;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// PostgreSQL client backing the marketplace
///
/// Owns the connection pool; query methods are grouped by concern across
/// this module (matching), `catalog` and `profiles`.
pub struct PostgresClient {
    pub(crate) pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Insert a service request and its selected choices
    ///
    /// Referenced service, sub-region, gender and choices must all exist.
    /// Returns the new request id.
    pub async fn create_request(&self, new: &NewServiceRequest) -> Result<i64, PostgresError> {
        if !self.service_exists(new.service_id).await? {
            return Err(PostgresError::NotFound(format!("service {}", new.service_id)));
        }

        let sub_region: Option<(i64,)> = sqlx::query_as("SELECT id FROM sub_regions WHERE id = $1")
            .bind(new.sub_region_id)
            .fetch_optional(&self.pool)
            .await?;
        if sub_region.is_none() {
            return Err(PostgresError::NotFound(format!("sub-region {}", new.sub_region_id)));
        }

        if let Some(gender_id) = new.preferred_master_gender_id {
            let gender: Option<(i64,)> = sqlx::query_as("SELECT id FROM genders WHERE id = $1")
                .bind(gender_id)
                .fetch_optional(&self.pool)
                .await?;
            if gender.is_none() {
                return Err(PostgresError::InvalidInput(format!("unknown gender {}", gender_id)));
            }
        }

        let choice_ids: Vec<i64> = new
            .choice_ids
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if !choice_ids.is_empty() {
            let (known,): (i64,) =
                sqlx::query_as("SELECT COUNT(*) FROM question_choices WHERE id = ANY($1)")
                    .bind(&choice_ids)
                    .fetch_one(&self.pool)
                    .await?;
            if known as usize != choice_ids.len() {
                return Err(PostgresError::InvalidInput(
                    "one or more choices do not exist".to_string(),
                ));
            }
        }

        let mut tx = self.pool.begin().await?;

        let (request_id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO requests (user_id, service_id, sub_region_id, preferred_master_gender_id, expired_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(new.user_id)
        .bind(new.service_id)
        .bind(new.sub_region_id)
        .bind(new.preferred_master_gender_id)
        .bind(new.expired_at)
        .fetch_one(&mut *tx)
        .await?;

        if !choice_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO selected_choices (request_id, choice_id)
                SELECT $1, UNNEST($2::BIGINT[])
                "#,
            )
            .bind(request_id)
            .bind(&choice_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            "Created request {} for user {} ({} choices)",
            request_id,
            new.user_id,
            choice_ids.len()
        );

        Ok(request_id)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl MatchRepository for PostgresClient {
    async fn service_exists(&self, service_id: i64) -> Result<bool, PostgresError> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM services WHERE id = $1)")
            .bind(service_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn find_request(&self, request_id: i64) -> Result<Option<ServiceRequest>, PostgresError> {
        let query = r#"
            SELECT r.id, r.user_id, r.service_id, r.sub_region_id, sr.region_id,
                   r.preferred_master_gender_id, r.expired_at, r.created_at
            FROM requests r
            JOIN sub_regions sr ON sr.id = r.sub_region_id
            WHERE r.id = $1
        "#;

        let request = sqlx::query_as::<_, ServiceRequest>(query)
            .bind(request_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(request)
    }

    async fn list_offerings(&self, service_id: i64) -> Result<Vec<Candidate>, PostgresError> {
        let query = r#"
            SELECT ms.id AS offering_id, ms.master_id, ms.is_main,
                   m.sub_region_id, sr.region_id, u.gender_id
            FROM master_services ms
            JOIN masters m ON m.id = ms.master_id
            JOIN sub_regions sr ON sr.id = m.sub_region_id
            JOIN users u ON u.id = m.user_id
            WHERE ms.service_id = $1
        "#;

        let candidates = sqlx::query_as::<_, Candidate>(query)
            .bind(service_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(candidates)
    }

    async fn insert_matches(
        &self,
        request_id: i64,
        batch_id: Uuid,
        scored: &[ScoredCandidate],
    ) -> Result<Vec<MatchRecord>, PostgresError> {
        let query = r#"
            INSERT INTO request_master_matches (request_id, master_id, master_service_id, priority, batch_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, request_id, master_id, master_service_id, priority, batch_id, created_at
        "#;

        let mut tx = self.pool.begin().await?;
        let mut records = Vec::with_capacity(scored.len());

        for entry in scored {
            let priority = i32::try_from(entry.priority).map_err(|_| {
                PostgresError::InvalidInput(format!("priority {} out of range", entry.priority))
            })?;

            let record = sqlx::query_as::<_, MatchRecord>(query)
                .bind(request_id)
                .bind(entry.candidate.master_id)
                .bind(entry.candidate.offering_id)
                .bind(priority)
                .bind(batch_id)
                .fetch_one(&mut *tx)
                .await?;

            records.push(record);
        }

        tx.commit().await?;

        tracing::debug!(
            "Inserted {} match records for request {} (batch {})",
            records.len(),
            request_id,
            batch_id
        );

        Ok(records)
    }

    async fn list_matches(&self, request_id: i64) -> Result<Vec<MatchRecord>, PostgresError> {
        let query = r#"
            SELECT id, request_id, master_id, master_service_id, priority, batch_id, created_at
            FROM request_master_matches
            WHERE request_id = $1
            ORDER BY priority DESC, created_at DESC, id
        "#;

        let records = sqlx::query_as::<_, MatchRecord>(query)
            .bind(request_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }
}
