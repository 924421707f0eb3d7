//! Trait repository implementation
//!
//! Traits are looked up either by id or by their normalized key, which lets
//! champion data that references `TFT16_Huntress`, `Huntress` or `huntress`
//! land on the same record.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, QueryBuilder, Row, Sqlite};
use uuid::Uuid;

use super::parse_id;
use super::traits::{
    PageableQuery, PaginatedRepository, QueryParams, Repository, UpdatableRepository,
};
use crate::errors::{RepositoryError, RepositoryResult};
use crate::image_assets::{normalize_key, AssetType};
use crate::models::{TftTrait, TftTraitCreateRequest, TftTraitUpdateRequest};
use crate::utils;

const TRAIT_COLUMNS: &str =
    "id, api_name, name, description, icon, set_number, effects, normalized_key, created_at, updated_at";

/// Query parameters specific to traits
#[derive(Debug, Clone, Default)]
pub struct TftTraitQuery {
    pub base: QueryParams,
    pub set_number: Option<i32>,
}

impl PageableQuery for TftTraitQuery {
    fn paginate(mut self, limit: u32, offset: u32) -> Self {
        self.base = self.base.paginate(limit, offset);
        self
    }
}

#[derive(Clone)]
pub struct TftTraitRepository {
    pool: Pool<Sqlite>,
}

impl TftTraitRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn row_to_trait(row: &SqliteRow) -> RepositoryResult<TftTrait> {
        Ok(TftTrait {
            id: parse_id(row)?,
            api_name: row.try_get("api_name")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            icon: row.try_get("icon")?,
            set_number: row.try_get("set_number")?,
            effects: serde_json::from_str(&row.try_get::<String, _>("effects")?)?,
            normalized_key: row.try_get("normalized_key")?,
            image_url: None,
            created_at: utils::parse_datetime(&row.try_get::<String, _>("created_at")?)?,
            updated_at: utils::parse_datetime(&row.try_get::<String, _>("updated_at")?)?,
        })
    }

    fn push_filters(query: &TftTraitQuery, builder: &mut QueryBuilder<'_, Sqlite>) {
        query.base.push_search(builder, &["name", "api_name"]);
        if let Some(set_number) = query.set_number {
            builder.push(" AND set_number = ").push_bind(set_number);
        }
    }

    /// Map any spelling of a trait identifier to its record.
    ///
    /// When several sets define the same trait the most recent set wins.
    pub async fn find_by_key(&self, raw_key: &str) -> RepositoryResult<Option<TftTrait>> {
        let normalized_key = normalize_key(AssetType::Trait, raw_key);
        if normalized_key.is_empty() {
            return Ok(None);
        }

        let row = sqlx::query(&format!(
            "SELECT {} FROM traits WHERE normalized_key = ? ORDER BY set_number DESC LIMIT 1",
            TRAIT_COLUMNS
        ))
        .bind(&normalized_key)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_trait).transpose()
    }
}

#[async_trait]
impl Repository<TftTrait, Uuid> for TftTraitRepository {
    type CreateRequest = TftTraitCreateRequest;
    type Query = TftTraitQuery;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<TftTrait>> {
        let row = sqlx::query(&format!("SELECT {} FROM traits WHERE id = ?", TRAIT_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_trait).transpose()
    }

    async fn find_all(&self, query: TftTraitQuery) -> RepositoryResult<Vec<TftTrait>> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM traits WHERE 1 = 1",
            TRAIT_COLUMNS
        ));
        Self::push_filters(&query, &mut builder);
        builder.push(" ORDER BY name, api_name");
        query.base.push_window(&mut builder);

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_trait).collect()
    }

    async fn create(&self, request: TftTraitCreateRequest) -> RepositoryResult<TftTrait> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO traits (id, api_name, name, description, icon, set_number, effects, normalized_key, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&request.api_name)
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.icon)
        .bind(request.set_number)
        .bind(serde_json::to_string(&request.effects)?)
        .bind(normalize_key(AssetType::Trait, &request.api_name))
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::record_not_found("traits", "id", id.to_string()))
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM traits WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::record_not_found("traits", "id", id.to_string()));
        }
        Ok(())
    }

    async fn count(&self, query: TftTraitQuery) -> RepositoryResult<u64> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM traits WHERE 1 = 1");
        Self::push_filters(&query, &mut builder);

        let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count as u64)
    }
}

#[async_trait]
impl UpdatableRepository<TftTrait, Uuid> for TftTraitRepository {
    type UpdateRequest = TftTraitUpdateRequest;

    async fn update(&self, id: Uuid, request: TftTraitUpdateRequest) -> RepositoryResult<TftTrait> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::record_not_found("traits", "id", id.to_string()))?;

        let api_name = request.api_name.unwrap_or(existing.api_name);

        sqlx::query(
            r#"
            UPDATE traits
            SET api_name = ?, name = ?, description = ?, icon = ?, set_number = ?, effects = ?,
                normalized_key = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&api_name)
        .bind(request.name.unwrap_or(existing.name))
        .bind(request.description.or(existing.description))
        .bind(request.icon.or(existing.icon))
        .bind(request.set_number.or(existing.set_number))
        .bind(serde_json::to_string(&request.effects.unwrap_or(existing.effects))?)
        .bind(normalize_key(AssetType::Trait, &api_name))
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::record_not_found("traits", "id", id.to_string()))
    }
}

impl PaginatedRepository<TftTrait, Uuid> for TftTraitRepository {}
