//! Repository trait definitions
//!
//! This module defines the core traits that all repositories implement,
//! providing a consistent interface for data access operations.

use async_trait::async_trait;
use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite};

use crate::errors::RepositoryResult;
use crate::utils::like_pattern;

/// Core repository trait providing CRUD operations
///
/// # Type Parameters
///
/// * `T` - The entity type (e.g., Item, Role)
/// * `ID` - The identifier type (usually Uuid)
#[async_trait]
pub trait Repository<T, ID: Send + 'static>: Send + Sync {
    /// Request type for creating new entities
    type CreateRequest;
    /// Query type for filtering and searching
    type Query;

    /// Find an entity by its ID
    ///
    /// # Returns
    ///
    /// * `Ok(Some(T))` - Entity found
    /// * `Ok(None)` - Entity not found
    /// * `Err(RepositoryError)` - Database or other error
    async fn find_by_id(&self, id: ID) -> RepositoryResult<Option<T>>;

    /// Find multiple entities based on a query
    async fn find_all(&self, query: Self::Query) -> RepositoryResult<Vec<T>>;

    /// Create a new entity
    ///
    /// # Returns
    ///
    /// * `Ok(T)` - Created entity with generated ID and timestamps
    /// * `Err(RepositoryError)` - Constraint or database error
    async fn create(&self, request: Self::CreateRequest) -> RepositoryResult<T>;

    /// Delete an entity by ID
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Entity deleted successfully
    /// * `Err(RepositoryError)` - Entity not found or database error
    async fn delete(&self, id: ID) -> RepositoryResult<()>;

    /// Count entities matching a query, ignoring its limit and offset
    async fn count(&self, query: Self::Query) -> RepositoryResult<u64>;

    /// Check if an entity exists by ID
    async fn exists(&self, id: ID) -> RepositoryResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}

/// Repositories whose records can be edited after creation
#[async_trait]
pub trait UpdatableRepository<T, ID: Send + 'static>: Repository<T, ID> {
    /// Request type for partial updates; absent fields keep their value
    type UpdateRequest;

    /// Update an existing entity
    ///
    /// # Returns
    ///
    /// * `Ok(T)` - Updated entity
    /// * `Err(RepositoryError)` - Entity not found, constraint, or database error
    async fn update(&self, id: ID, request: Self::UpdateRequest) -> RepositoryResult<T>;
}

/// Queries that can be narrowed to a single page
pub trait PageableQuery {
    fn paginate(self, limit: u32, offset: u32) -> Self;
}

/// Trait for repositories that support pagination
///
/// The default implementation counts the full result set and then fetches
/// one window of it through [`Repository::find_all`].
#[async_trait]
pub trait PaginatedRepository<T, ID>: Repository<T, ID>
where
    T: Send + 'static,
    ID: Send + 'static,
    Self::Query: PageableQuery + Clone + Send + 'static,
{
    /// Find entities with pagination
    ///
    /// # Arguments
    ///
    /// * `query` - Query parameters
    /// * `page` - Page number (1-based)
    /// * `limit` - Number of items per page
    async fn find_paginated(
        &self,
        query: Self::Query,
        page: u32,
        limit: u32,
    ) -> RepositoryResult<PaginatedResult<T>> {
        let page = page.max(1);
        let total_count = self.count(query.clone()).await?;
        let offset = (page - 1).saturating_mul(limit);
        let items = self.find_all(query.paginate(limit, offset)).await?;

        Ok(PaginatedResult::new(items, page, limit, total_count))
    }
}

/// Common query parameters used across repositories
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    /// Case-insensitive substring matched against the entity's text columns
    pub search: Option<String>,
    /// Limit number of results
    pub limit: Option<u32>,
    /// Offset for results
    pub offset: Option<u32>,
}

impl QueryParams {
    /// Create new empty query parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Set search term, ignoring blank terms
    pub fn search<S: Into<String>>(mut self, term: S) -> Self {
        let term = term.into();
        self.search = if term.trim().is_empty() {
            None
        } else {
            Some(term.trim().to_string())
        };
        self
    }

    /// Append `AND (col LIKE ? OR ...)` for the search term, if any
    pub fn push_search(&self, builder: &mut QueryBuilder<'_, Sqlite>, columns: &[&str]) {
        let Some(search) = &self.search else {
            return;
        };

        let pattern = like_pattern(search);
        builder.push(" AND (");
        for (index, column) in columns.iter().enumerate() {
            if index > 0 {
                builder.push(" OR ");
            }
            builder
                .push(format!("LOWER({}) LIKE ", column))
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\'");
        }
        builder.push(")");
    }

    /// Append `LIMIT ? OFFSET ?` when a window is set
    pub fn push_window(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
        if let Some(limit) = self.limit {
            builder.push(" LIMIT ").push_bind(i64::from(limit));
            builder
                .push(" OFFSET ")
                .push_bind(i64::from(self.offset.unwrap_or(0)));
        }
    }
}

impl PageableQuery for QueryParams {
    fn paginate(mut self, limit: u32, offset: u32) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }
}

/// Standard paginated result structure
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResult<T> {
    /// The items for this page
    pub items: Vec<T>,
    /// Current page number (1-based)
    pub page: u32,
    /// Items per page
    pub limit: u32,
    /// Total number of items across all pages
    pub total_count: u64,
    /// Total number of pages
    pub total_pages: u32,
    /// Whether there is a next page
    pub has_next: bool,
    /// Whether there is a previous page
    pub has_previous: bool,
}

impl<T> PaginatedResult<T> {
    /// Create a new paginated result
    pub fn new(items: Vec<T>, page: u32, limit: u32, total_count: u64) -> Self {
        let total_pages = if limit > 0 {
            total_count.div_ceil(u64::from(limit)) as u32
        } else {
            1
        };

        Self {
            items,
            page,
            limit,
            total_count,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginated_result_metadata() {
        let result = PaginatedResult::new(vec![1, 2], 2, 2, 5);
        assert_eq!(result.total_pages, 3);
        assert!(result.has_next);
        assert!(result.has_previous);

        let last = PaginatedResult::new(vec![5], 3, 2, 5);
        assert!(!last.has_next);

        let empty = PaginatedResult::<u8>::new(vec![], 1, 50, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next);
        assert!(!empty.has_previous);
    }

    #[test]
    fn test_search_ignores_blank_terms() {
        assert!(QueryParams::new().search("   ").search.is_none());
        assert_eq!(
            QueryParams::new().search(" sword ").search.as_deref(),
            Some("sword")
        );
    }

    #[test]
    fn test_search_clause() {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT id FROM items WHERE 1 = 1");
        QueryParams::new()
            .search("bf")
            .paginate(10, 20)
            .push_search(&mut builder, &["name", "api_name"]);
        assert_eq!(
            builder.sql(),
            "SELECT id FROM items WHERE 1 = 1 AND (LOWER(name) LIKE ? ESCAPE '\\' OR LOWER(api_name) LIKE ? ESCAPE '\\')"
        );
    }
}
