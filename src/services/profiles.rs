use crate::models::{MasterProfile, MasterRow, MasterServiceEntry, MasterSummary, Review};
use crate::services::postgres::{PostgresClient, PostgresError};

impl PostgresClient {
    /// Page through master summaries, optionally restricted to one service
    pub async fn list_masters(
        &self,
        service_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MasterSummary>, PostgresError> {
        let query = r#"
            SELECT m.id AS master_id, u.name, u.profile_image, m.introduction, m.career,
                   (SELECT s.name
                      FROM master_services ms
                      JOIN services s ON s.id = ms.service_id
                     WHERE ms.master_id = m.id AND ms.is_main
                     ORDER BY ms.id
                     LIMIT 1) AS main_service,
                   sr.name AS sub_region, r.name AS region,
                   (SELECT COUNT(*) FROM reviews rv WHERE rv.master_id = m.id) AS review_count,
                   (SELECT AVG(rv.rating)::FLOAT8 FROM reviews rv WHERE rv.master_id = m.id) AS average_rating
            FROM masters m
            JOIN users u ON u.id = m.user_id
            JOIN sub_regions sr ON sr.id = m.sub_region_id
            JOIN regions r ON r.id = sr.region_id
            WHERE $1::BIGINT IS NULL
               OR EXISTS (SELECT 1 FROM master_services ms WHERE ms.master_id = m.id AND ms.service_id = $1)
            ORDER BY review_count DESC, m.id
            LIMIT $2 OFFSET $3
        "#;

        let masters = sqlx::query_as::<_, MasterSummary>(query)
            .bind(service_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(masters)
    }

    /// Full profile of one master, or None when the master does not exist
    pub async fn master_profile(&self, master_id: i64) -> Result<Option<MasterProfile>, PostgresError> {
        let query = r#"
            SELECT m.id AS master_id, u.name, u.profile_image, m.introduction, m.description,
                   m.birthdate, m.career, sr.name AS sub_region, r.name AS region
            FROM masters m
            JOIN users u ON u.id = m.user_id
            JOIN sub_regions sr ON sr.id = m.sub_region_id
            JOIN regions r ON r.id = sr.region_id
            WHERE m.id = $1
        "#;

        let row = match sqlx::query_as::<_, MasterRow>(query)
            .bind(master_id)
            .fetch_optional(&self.pool)
            .await?
        {
            Some(row) => row,
            None => return Ok(None),
        };

        let services = sqlx::query_as::<_, MasterServiceEntry>(
            r#"
            SELECT s.id AS service_id, s.name, ms.is_main
            FROM master_services ms
            JOIN services s ON s.id = ms.service_id
            WHERE ms.master_id = $1
            ORDER BY ms.is_main DESC, s.id
            "#,
        )
        .bind(master_id)
        .fetch_all(&self.pool)
        .await?;

        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT rv.id, u.name AS user_name, rv.rating::FLOAT8 AS rating,
                   rv.image_url, rv.content, rv.created_at
            FROM reviews rv
            JOIN users u ON u.id = rv.user_id
            WHERE rv.master_id = $1
            ORDER BY rv.created_at DESC, rv.id DESC
            "#,
        )
        .bind(master_id)
        .fetch_all(&self.pool)
        .await?;

        let certificates: Vec<(String,)> = sqlx::query_as(
            "SELECT image_url FROM certificates WHERE master_id = $1 ORDER BY id",
        )
        .bind(master_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(MasterProfile {
            master_id: row.master_id,
            name: row.name,
            profile_image: row.profile_image,
            introduction: row.introduction,
            description: row.description,
            birthdate: row.birthdate,
            career: row.career,
            sub_region: row.sub_region,
            region: row.region,
            services,
            review_count: reviews.len(),
            average_rating: average_rating(&reviews),
            reviews,
            certificates: certificates.into_iter().map(|(url,)| url).collect(),
        }))
    }

    /// Master id owned by a user, if the user is a master
    pub async fn find_master_id(&self, user_id: i64) -> Result<Option<i64>, PostgresError> {
        let master: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM masters WHERE user_id = $1 ORDER BY id LIMIT 1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(master.map(|(id,)| id))
    }

    /// Mark one offered service as the master's main service and clear the rest
    pub async fn set_main_service(&self, master_id: i64, service_id: i64) -> Result<(), PostgresError> {
        let mut tx = self.pool.begin().await?;

        let (offered,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM master_services WHERE master_id = $1 AND service_id = $2)",
        )
        .bind(master_id)
        .bind(service_id)
        .fetch_one(&mut *tx)
        .await?;

        if !offered {
            return Err(PostgresError::NotFound(format!(
                "master {} does not offer service {}",
                master_id, service_id
            )));
        }

        sqlx::query("UPDATE master_services SET is_main = (service_id = $2) WHERE master_id = $1")
            .bind(master_id)
            .bind(service_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!("Master {} main service set to {}", master_id, service_id);
        Ok(())
    }

    pub async fn update_introduction(&self, master_id: i64, introduction: &str) -> Result<(), PostgresError> {
        sqlx::query("UPDATE masters SET introduction = $2, updated_at = NOW() WHERE id = $1")
            .bind(master_id)
            .bind(introduction)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn update_description(&self, master_id: i64, description: &str) -> Result<(), PostgresError> {
        sqlx::query("UPDATE masters SET description = $2, updated_at = NOW() WHERE id = $1")
            .bind(master_id)
            .bind(description)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Mean review rating rounded to one decimal place
fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }

    let total: f64 = reviews.iter().map(|review| review.rating).sum();
    let mean = total / reviews.len() as f64;

    Some((mean * 10.0).round() / 10.0)
}
