//! Feedback repository implementation
//!
//! Feedback is append-only from the app's point of view: it can be listed,
//! read and removed, but never edited.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, QueryBuilder, Row, Sqlite};
use std::str::FromStr;
use uuid::Uuid;

use super::parse_id;
use super::traits::{PageableQuery, PaginatedRepository, QueryParams, Repository};
use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::{Feedback, FeedbackCategory, FeedbackCreateRequest};
use crate::utils;

const FEEDBACK_COLUMNS: &str = "id, message, category, contact, app_version, platform, created_at";

#[derive(Debug, Clone, Default)]
pub struct FeedbackQuery {
    pub base: QueryParams,
    pub category: Option<FeedbackCategory>,
}

impl PageableQuery for FeedbackQuery {
    fn paginate(mut self, limit: u32, offset: u32) -> Self {
        self.base = self.base.paginate(limit, offset);
        self
    }
}

#[derive(Clone)]
pub struct FeedbackRepository {
    pool: Pool<Sqlite>,
}

impl FeedbackRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn row_to_feedback(row: &SqliteRow) -> RepositoryResult<Feedback> {
        let category: String = row.try_get("category")?;
        Ok(Feedback {
            id: parse_id(row)?,
            message: row.try_get("message")?,
            category: FeedbackCategory::from_str(&category)
                .map_err(|e| RepositoryError::query_failed("decode feedback category", e.to_string()))?,
            contact: row.try_get("contact")?,
            app_version: row.try_get("app_version")?,
            platform: row.try_get("platform")?,
            created_at: utils::parse_datetime(&row.try_get::<String, _>("created_at")?)?,
        })
    }

    fn push_filters(query: &FeedbackQuery, builder: &mut QueryBuilder<'_, Sqlite>) {
        query.base.push_search(builder, &["message"]);
        if let Some(category) = query.category {
            builder.push(" AND category = ").push_bind(category.as_str());
        }
    }
}

#[async_trait]
impl Repository<Feedback, Uuid> for FeedbackRepository {
    type CreateRequest = FeedbackCreateRequest;
    type Query = FeedbackQuery;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Feedback>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM feedback WHERE id = ?",
            FEEDBACK_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_feedback).transpose()
    }

    async fn find_all(&self, query: FeedbackQuery) -> RepositoryResult<Vec<Feedback>> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM feedback WHERE 1 = 1",
            FEEDBACK_COLUMNS
        ));
        Self::push_filters(&query, &mut builder);
        builder.push(" ORDER BY created_at DESC, id");
        query.base.push_window(&mut builder);

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_feedback).collect()
    }

    async fn create(&self, request: FeedbackCreateRequest) -> RepositoryResult<Feedback> {
        let id = Uuid::new_v4();

        sqlx::query(
            "INSERT INTO feedback (id, message, category, contact, app_version, platform, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(request.message.trim())
        .bind(request.category.as_str())
        .bind(&request.contact)
        .bind(&request.app_version)
        .bind(&request.platform)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::record_not_found("feedback", "id", id.to_string()))
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM feedback WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::record_not_found("feedback", "id", id.to_string()));
        }
        Ok(())
    }

    async fn count(&self, query: FeedbackQuery) -> RepositoryResult<u64> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM feedback WHERE 1 = 1");
        Self::push_filters(&query, &mut builder);

        let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count as u64)
    }
}

impl PaginatedRepository<Feedback, Uuid> for FeedbackRepository {}
