use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::require_non_empty;
use crate::errors::{AppError, AppResult};

/// A single screen view reported by the app
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenView {
    pub id: Uuid,
    pub screen_name: String,
    pub session_id: Option<String>,
    pub device_id: Option<String>,
    pub duration_ms: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenViewCreateRequest {
    pub screen_name: String,
    pub session_id: Option<String>,
    pub device_id: Option<String>,
    pub duration_ms: Option<i64>,
}

impl ScreenViewCreateRequest {
    pub fn validate(&self) -> AppResult<()> {
        require_non_empty("screen_name", &self.screen_name)?;
        if matches!(self.duration_ms, Some(d) if d < 0) {
            return Err(AppError::validation("duration_ms must not be negative"));
        }
        Ok(())
    }
}

/// Aggregated views for one screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenStats {
    pub screen_name: String,
    pub views: i64,
    pub average_duration_ms: Option<f64>,
}
