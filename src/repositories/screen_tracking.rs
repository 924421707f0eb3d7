//! Screen view repository implementation

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, QueryBuilder, Row, Sqlite};
use uuid::Uuid;

use super::parse_id;
use super::traits::{PageableQuery, PaginatedRepository, QueryParams, Repository};
use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::{ScreenStats, ScreenView, ScreenViewCreateRequest};
use crate::utils;

const SCREEN_VIEW_COLUMNS: &str = "id, screen_name, session_id, device_id, duration_ms, created_at";

#[derive(Debug, Clone, Default)]
pub struct ScreenViewQuery {
    pub base: QueryParams,
    /// Exact screen name
    pub screen_name: Option<String>,
}

impl PageableQuery for ScreenViewQuery {
    fn paginate(mut self, limit: u32, offset: u32) -> Self {
        self.base = self.base.paginate(limit, offset);
        self
    }
}

#[derive(Clone)]
pub struct ScreenViewRepository {
    pool: Pool<Sqlite>,
}

impl ScreenViewRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn row_to_view(row: &SqliteRow) -> RepositoryResult<ScreenView> {
        Ok(ScreenView {
            id: parse_id(row)?,
            screen_name: row.try_get("screen_name")?,
            session_id: row.try_get("session_id")?,
            device_id: row.try_get("device_id")?,
            duration_ms: row.try_get("duration_ms")?,
            created_at: utils::parse_datetime(&row.try_get::<String, _>("created_at")?)?,
        })
    }

    fn push_filters(query: &ScreenViewQuery, builder: &mut QueryBuilder<'_, Sqlite>) {
        query.base.push_search(builder, &["screen_name"]);
        if let Some(screen_name) = &query.screen_name {
            builder
                .push(" AND screen_name = ")
                .push_bind(screen_name.clone());
        }
    }

    /// Views and mean duration per screen, busiest screens first
    pub async fn stats(&self) -> RepositoryResult<Vec<ScreenStats>> {
        let rows = sqlx::query(
            r#"
            SELECT screen_name, COUNT(*) AS views, AVG(duration_ms) AS average_duration_ms
            FROM screen_views
            GROUP BY screen_name
            ORDER BY views DESC, screen_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> RepositoryResult<ScreenStats> {
                Ok(ScreenStats {
                    screen_name: row.try_get("screen_name")?,
                    views: row.try_get("views")?,
                    average_duration_ms: row.try_get("average_duration_ms")?,
                })
            })
            .collect()
    }
}

#[async_trait]
impl Repository<ScreenView, Uuid> for ScreenViewRepository {
    type CreateRequest = ScreenViewCreateRequest;
    type Query = ScreenViewQuery;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<ScreenView>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM screen_views WHERE id = ?",
            SCREEN_VIEW_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_view).transpose()
    }

    async fn find_all(&self, query: ScreenViewQuery) -> RepositoryResult<Vec<ScreenView>> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM screen_views WHERE 1 = 1",
            SCREEN_VIEW_COLUMNS
        ));
        Self::push_filters(&query, &mut builder);
        builder.push(" ORDER BY created_at DESC, id");
        query.base.push_window(&mut builder);

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_view).collect()
    }

    async fn create(&self, request: ScreenViewCreateRequest) -> RepositoryResult<ScreenView> {
        let id = Uuid::new_v4();

        sqlx::query(
            "INSERT INTO screen_views (id, screen_name, session_id, device_id, duration_ms, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(request.screen_name.trim())
        .bind(&request.session_id)
        .bind(&request.device_id)
        .bind(request.duration_ms)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        self.find_by_id(id).await?.ok_or_else(|| {
            RepositoryError::record_not_found("screen_views", "id", id.to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM screen_views WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::record_not_found(
                "screen_views",
                "id",
                id.to_string(),
            ));
        }
        Ok(())
    }

    async fn count(&self, query: ScreenViewQuery) -> RepositoryResult<u64> {
        let mut builder =
            QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM screen_views WHERE 1 = 1");
        Self::push_filters(&query, &mut builder);

        let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count as u64)
    }
}

impl PaginatedRepository<ScreenView, Uuid> for ScreenViewRepository {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::memory_database;

    fn view(screen_name: &str, duration_ms: Option<i64>) -> ScreenViewCreateRequest {
        ScreenViewCreateRequest {
            screen_name: screen_name.to_string(),
            session_id: Some("session-1".to_string()),
            device_id: None,
            duration_ms,
        }
    }

    #[tokio::test]
    async fn test_stats_ordered_by_views() {
        let repo = ScreenViewRepository::new(memory_database().await.pool());
        for (screen, duration) in [
            ("items", Some(1000)),
            ("comps", Some(3000)),
            ("comps", Some(5000)),
            ("comps", None),
        ] {
            repo.create(view(screen, duration)).await.unwrap();
        }

        let stats = repo.stats().await.unwrap();
        assert_eq!(
            stats,
            vec![
                ScreenStats {
                    screen_name: "comps".to_string(),
                    views: 3,
                    average_duration_ms: Some(4000.0),
                },
                ScreenStats {
                    screen_name: "items".to_string(),
                    views: 1,
                    average_duration_ms: Some(1000.0),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_stats_without_durations() {
        let repo = ScreenViewRepository::new(memory_database().await.pool());
        repo.create(view("home", None)).await.unwrap();

        let stats = repo.stats().await.unwrap();
        assert_eq!(stats[0].views, 1);
        assert_eq!(stats[0].average_duration_ms, None);
    }

    #[tokio::test]
    async fn test_screen_name_filter_and_delete() {
        let repo = ScreenViewRepository::new(memory_database().await.pool());
        let home = repo.create(view("home", Some(10))).await.unwrap();
        repo.create(view("home_settings", Some(20))).await.unwrap();

        let exact = ScreenViewQuery {
            base: QueryParams::new(),
            screen_name: Some("home".to_string()),
        };
        assert_eq!(repo.count(exact).await.unwrap(), 1);

        repo.delete(home.id).await.unwrap();
        assert!(repo.find_by_id(home.id).await.unwrap().is_none());
    }
}
