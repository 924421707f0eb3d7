//! Role repository implementation

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, QueryBuilder, Row, Sqlite};
use uuid::Uuid;

use super::parse_id;
use super::traits::{PaginatedRepository, QueryParams, Repository, UpdatableRepository};
use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::{Role, RoleCreateRequest, RoleUpdateRequest};
use crate::utils;

const ROLE_COLUMNS: &str = "id, api_name, name, description, icon, created_at, updated_at";

#[derive(Clone)]
pub struct RoleRepository {
    pool: Pool<Sqlite>,
}

impl RoleRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn row_to_role(row: &SqliteRow) -> RepositoryResult<Role> {
        Ok(Role {
            id: parse_id(row)?,
            api_name: row.try_get("api_name")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            icon: row.try_get("icon")?,
            created_at: utils::parse_datetime(&row.try_get::<String, _>("created_at")?)?,
            updated_at: utils::parse_datetime(&row.try_get::<String, _>("updated_at")?)?,
        })
    }
}

#[async_trait]
impl Repository<Role, Uuid> for RoleRepository {
    type CreateRequest = RoleCreateRequest;
    type Query = QueryParams;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Role>> {
        let row = sqlx::query(&format!("SELECT {} FROM roles WHERE id = ?", ROLE_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_role).transpose()
    }

    async fn find_all(&self, query: QueryParams) -> RepositoryResult<Vec<Role>> {
        let mut builder =
            QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM roles WHERE 1 = 1", ROLE_COLUMNS));
        query.push_search(&mut builder, &["name", "api_name"]);
        builder.push(" ORDER BY name, api_name");
        query.push_window(&mut builder);

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_role).collect()
    }

    async fn create(&self, request: RoleCreateRequest) -> RepositoryResult<Role> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO roles (id, api_name, name, description, icon, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&request.api_name)
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.icon)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::record_not_found("roles", "id", id.to_string()))
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM roles WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::record_not_found("roles", "id", id.to_string()));
        }
        Ok(())
    }

    async fn count(&self, query: QueryParams) -> RepositoryResult<u64> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM roles WHERE 1 = 1");
        query.push_search(&mut builder, &["name", "api_name"]);

        let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count as u64)
    }
}

#[async_trait]
impl UpdatableRepository<Role, Uuid> for RoleRepository {
    type UpdateRequest = RoleUpdateRequest;

    async fn update(&self, id: Uuid, request: RoleUpdateRequest) -> RepositoryResult<Role> {
        let result = sqlx::query(
            "UPDATE roles
             SET api_name = COALESCE(?, api_name),
                 name = COALESCE(?, name),
                 description = COALESCE(?, description),
                 icon = COALESCE(?, icon),
                 updated_at = ?
             WHERE id = ?",
        )
        .bind(&request.api_name)
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.icon)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::record_not_found("roles", "id", id.to_string()));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::record_not_found("roles", "id", id.to_string()))
    }
}

impl PaginatedRepository<Role, Uuid> for RoleRepository {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::memory_database;

    fn role_request(api_name: &str, name: &str) -> RoleCreateRequest {
        RoleCreateRequest {
            api_name: api_name.to_string(),
            name: name.to_string(),
            description: None,
            icon: None,
        }
    }

    #[tokio::test]
    async fn test_crud_round() {
        let repo = RoleRepository::new(memory_database().await.pool());

        let tank = repo.create(role_request("TFT16_Tank", "Tank")).await.unwrap();
        assert!(repo.exists(tank.id).await.unwrap());

        let updated = repo
            .update(
                tank.id,
                RoleUpdateRequest {
                    description: Some("Front line".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Tank");
        assert_eq!(updated.description.as_deref(), Some("Front line"));

        repo.delete(tank.id).await.unwrap();
        assert!(!repo.exists(tank.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_role() {
        let repo = RoleRepository::new(memory_database().await.pool());

        let error = repo
            .update(Uuid::new_v4(), RoleUpdateRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(error, RepositoryError::RecordNotFound { .. }));
    }

    #[tokio::test]
    async fn test_search_escapes_like_wildcards() {
        let repo = RoleRepository::new(memory_database().await.pool());
        repo.create(role_request("TFT16_Caster", "Caster")).await.unwrap();
        repo.create(role_request("TFT16_Fighter", "Fighter")).await.unwrap();

        let page = repo
            .find_paginated(QueryParams::new().search("%"), 1, 10)
            .await
            .unwrap();
        assert_eq!(page.total_count, 0);

        let casters = repo
            .find_all(QueryParams::new().search("cast"))
            .await
            .unwrap();
        assert_eq!(casters.len(), 1);
    }
}
