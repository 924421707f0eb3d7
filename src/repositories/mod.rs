//! Repository pattern implementation for data access
//!
//! Each table gets one repository implementing [`Repository`], plus
//! [`UpdatableRepository`] for the reference data that can be edited.
//! Pagination comes for free through [`PaginatedRepository`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use tft_data_api::repositories::{ItemRepository, Repository};
//!
//! let repo = ItemRepository::new(database.pool());
//! let item = repo.find_by_id(id).await?;
//! ```

use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use crate::errors::{RepositoryError, RepositoryResult};

pub mod feedback;
pub mod item;
pub mod role;
pub mod screen_tracking;
pub mod tft_trait;
pub mod traits;

pub use feedback::{FeedbackQuery, FeedbackRepository};
pub use item::{ItemQuery, ItemRepository};
pub use role::RoleRepository;
pub use screen_tracking::{ScreenViewQuery, ScreenViewRepository};
pub use tft_trait::{TftTraitQuery, TftTraitRepository};
pub use traits::*;

/// Decode the TEXT `id` column shared by every table
pub(crate) fn parse_id(row: &SqliteRow) -> RepositoryResult<Uuid> {
    let id: String = row.try_get("id")?;
    Uuid::parse_str(&id).map_err(|e| RepositoryError::query_failed("decode id", e.to_string()))
}
