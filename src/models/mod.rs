use crate::errors::{AppError, AppResult};

pub mod feedback;
pub mod item;
pub mod metadata;
pub mod role;
pub mod screen_tracking;
pub mod tft_trait;

pub use feedback::{Feedback, FeedbackCategory, FeedbackCreateRequest};
pub use item::{Item, ItemCreateRequest, ItemUpdateRequest};
pub use metadata::{Metadata, MetadataValue};
pub use role::{Role, RoleCreateRequest, RoleUpdateRequest};
pub use screen_tracking::{ScreenStats, ScreenView, ScreenViewCreateRequest};
pub use tft_trait::{TftTrait, TftTraitCreateRequest, TftTraitUpdateRequest, TraitEffect};

pub(crate) fn require_non_empty(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{} must not be empty", field)));
    }
    Ok(())
}
