//! Item repository implementation

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, QueryBuilder, Row, Sqlite};
use uuid::Uuid;

use super::traits::{
    PageableQuery, PaginatedRepository, QueryParams, Repository, UpdatableRepository,
};
use super::parse_id;
use crate::errors::{RepositoryError, RepositoryResult};
use crate::image_assets::{normalize_key, AssetType};
use crate::models::{Item, ItemCreateRequest, ItemUpdateRequest};
use crate::utils;

const ITEM_COLUMNS: &str = "id, api_name, name, description, icon, composition, tags, is_unique, effects, normalized_key, created_at, updated_at";

/// Query parameters specific to items
#[derive(Debug, Clone, Default)]
pub struct ItemQuery {
    pub base: QueryParams,
    /// Only items carrying this tag
    pub tag: Option<String>,
}

impl PageableQuery for ItemQuery {
    fn paginate(mut self, limit: u32, offset: u32) -> Self {
        self.base = self.base.paginate(limit, offset);
        self
    }
}

/// Icon key for an item: its CDN icon path when known, else its api name
pub fn item_image_key(api_name: &str, icon: Option<&str>) -> String {
    normalize_key(AssetType::Item, icon.unwrap_or(api_name))
}

#[derive(Clone)]
pub struct ItemRepository {
    pool: Pool<Sqlite>,
}

impl ItemRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn row_to_item(row: &SqliteRow) -> RepositoryResult<Item> {
        Ok(Item {
            id: parse_id(row)?,
            api_name: row.try_get("api_name")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            icon: row.try_get("icon")?,
            composition: serde_json::from_str(&row.try_get::<String, _>("composition")?)?,
            tags: serde_json::from_str(&row.try_get::<String, _>("tags")?)?,
            unique: row.try_get("is_unique")?,
            effects: serde_json::from_str(&row.try_get::<String, _>("effects")?)?,
            normalized_key: row.try_get("normalized_key")?,
            image_url: None,
            created_at: utils::parse_datetime(&row.try_get::<String, _>("created_at")?)?,
            updated_at: utils::parse_datetime(&row.try_get::<String, _>("updated_at")?)?,
        })
    }

    fn push_filters(query: &ItemQuery, builder: &mut QueryBuilder<'_, Sqlite>) {
        query.base.push_search(builder, &["name", "api_name"]);
        if let Some(tag) = &query.tag {
            builder
                .push(" AND EXISTS (SELECT 1 FROM json_each(items.tags) WHERE json_each.value = ")
                .push_bind(tag.clone())
                .push(")");
        }
    }
}

#[async_trait]
impl Repository<Item, Uuid> for ItemRepository {
    type CreateRequest = ItemCreateRequest;
    type Query = ItemQuery;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Item>> {
        let row = sqlx::query(&format!("SELECT {} FROM items WHERE id = ?", ITEM_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_item).transpose()
    }

    async fn find_all(&self, query: ItemQuery) -> RepositoryResult<Vec<Item>> {
        let mut builder =
            QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM items WHERE 1 = 1", ITEM_COLUMNS));
        Self::push_filters(&query, &mut builder);
        builder.push(" ORDER BY name, api_name");
        query.base.push_window(&mut builder);

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_item).collect()
    }

    async fn create(&self, request: ItemCreateRequest) -> RepositoryResult<Item> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();
        let normalized_key = item_image_key(&request.api_name, request.icon.as_deref());

        sqlx::query(
            r#"
            INSERT INTO items (id, api_name, name, description, icon, composition, tags, is_unique, effects, normalized_key, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&request.api_name)
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.icon)
        .bind(serde_json::to_string(&request.composition)?)
        .bind(serde_json::to_string(&request.tags)?)
        .bind(request.unique)
        .bind(serde_json::to_string(&request.effects)?)
        .bind(&normalized_key)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::record_not_found("items", "id", id.to_string()))
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::record_not_found("items", "id", id.to_string()));
        }
        Ok(())
    }

    async fn count(&self, query: ItemQuery) -> RepositoryResult<u64> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM items WHERE 1 = 1");
        Self::push_filters(&query, &mut builder);

        let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count as u64)
    }
}

#[async_trait]
impl UpdatableRepository<Item, Uuid> for ItemRepository {
    type UpdateRequest = ItemUpdateRequest;

    async fn update(&self, id: Uuid, request: ItemUpdateRequest) -> RepositoryResult<Item> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::record_not_found("items", "id", id.to_string()))?;

        let api_name = request.api_name.unwrap_or(existing.api_name);
        let icon = request.icon.or(existing.icon);
        let normalized_key = item_image_key(&api_name, icon.as_deref());

        sqlx::query(
            r#"
            UPDATE items
            SET api_name = ?, name = ?, description = ?, icon = ?, composition = ?, tags = ?,
                is_unique = ?, effects = ?, normalized_key = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&api_name)
        .bind(request.name.unwrap_or(existing.name))
        .bind(request.description.or(existing.description))
        .bind(&icon)
        .bind(serde_json::to_string(
            &request.composition.unwrap_or(existing.composition),
        )?)
        .bind(serde_json::to_string(&request.tags.unwrap_or(existing.tags))?)
        .bind(request.unique.unwrap_or(existing.unique))
        .bind(serde_json::to_string(&request.effects.unwrap_or(existing.effects))?)
        .bind(&normalized_key)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::record_not_found("items", "id", id.to_string()))
    }
}

impl PaginatedRepository<Item, Uuid> for ItemRepository {}
