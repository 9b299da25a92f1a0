use crate::models::{Category, Gender, Question, QuestionChoice, Region, Service, ServiceDetail, SubRegion};
use crate::services::postgres::{PostgresClient, PostgresError};

impl PostgresClient {
    pub async fn list_categories(&self) -> Result<Vec<Category>, PostgresError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, icon_image_url FROM categories ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn find_category(&self, category_id: i64) -> Result<Option<Category>, PostgresError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, icon_image_url FROM categories WHERE id = $1",
        )
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    pub async fn list_services(&self, category_id: i64) -> Result<Vec<Service>, PostgresError> {
        let services = sqlx::query_as::<_, Service>(
            "SELECT id, category_id, name, image_url FROM services WHERE category_id = $1 ORDER BY id",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    /// Service with its category and review figures across the masters offering it
    pub async fn service_detail(&self, service_id: i64) -> Result<Option<ServiceDetail>, PostgresError> {
        let query = r#"
            SELECT s.id AS service_id, s.name, s.image_url,
                   c.id AS category_id, c.name AS category_name,
                   (SELECT COUNT(DISTINCT ms.master_id)
                      FROM master_services ms
                     WHERE ms.service_id = s.id) AS master_count,
                   (SELECT COUNT(*)
                      FROM reviews rv
                     WHERE rv.master_id IN (SELECT master_id FROM master_services WHERE service_id = s.id)
                   ) AS review_count,
                   (SELECT AVG(rv.rating)::FLOAT8
                      FROM reviews rv
                     WHERE rv.master_id IN (SELECT master_id FROM master_services WHERE service_id = s.id)
                   ) AS average_rating
            FROM services s
            JOIN categories c ON c.id = s.category_id
            WHERE s.id = $1
        "#;

        let detail = sqlx::query_as::<_, ServiceDetail>(query)
            .bind(service_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(detail)
    }

    /// Regions with their sub-regions nested
    pub async fn list_regions(&self) -> Result<Vec<Region>, PostgresError> {
        let rows: Vec<(i64, String, Option<i64>, Option<String>)> = sqlx::query_as(
            r#"
            SELECT r.id, r.name, sr.id, sr.name
            FROM regions r
            LEFT JOIN sub_regions sr ON sr.region_id = r.id
            ORDER BY r.id, sr.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let regions = group_nested(rows.into_iter().map(|(id, name, child_id, child_name)| {
            let child = child_id.zip(child_name).map(|(id, name)| SubRegion { id, name });
            (id, name, child)
        }))
        .into_iter()
        .map(|(id, name, sub_regions)| Region { id, name, sub_regions })
        .collect();

        Ok(regions)
    }

    /// Questions with their choices nested
    pub async fn list_questions(&self) -> Result<Vec<Question>, PostgresError> {
        let rows: Vec<(i64, String, Option<i64>, Option<String>)> = sqlx::query_as(
            r#"
            SELECT q.id, q.name, qc.id, qc.choice
            FROM questions q
            LEFT JOIN question_choices qc ON qc.question_id = q.id
            ORDER BY q.id, qc.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let questions = group_nested(rows.into_iter().map(|(id, name, choice_id, choice)| {
            let child = choice_id.zip(choice).map(|(id, choice)| QuestionChoice { id, choice });
            (id, name, child)
        }))
        .into_iter()
        .map(|(id, name, choices)| Question { id, name, choices })
        .collect();

        Ok(questions)
    }

    pub async fn list_genders(&self) -> Result<Vec<Gender>, PostgresError> {
        let genders = sqlx::query_as::<_, Gender>("SELECT id, name FROM genders ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(genders)
    }
}

/// Fold parent/child join rows (ordered by parent id) into parents with child lists
///
/// A parent with no children arrives as a single row with `None`.
fn group_nested<C>(
    rows: impl IntoIterator<Item = (i64, String, Option<C>)>,
) -> Vec<(i64, String, Vec<C>)> {
    let mut grouped: Vec<(i64, String, Vec<C>)> = Vec::new();

    for (id, name, child) in rows {
        match grouped.last_mut() {
            Some((last_id, _, children)) if *last_id == id => children.extend(child),
            _ => grouped.push((id, name, child.into_iter().collect())),
        }
    }

    grouped
}
