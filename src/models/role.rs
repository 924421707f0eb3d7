use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::require_non_empty;
use crate::errors::AppResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub api_name: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleCreateRequest {
    pub api_name: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
}

impl RoleCreateRequest {
    pub fn validate(&self) -> AppResult<()> {
        require_non_empty("api_name", &self.api_name)?;
        require_non_empty("name", &self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleUpdateRequest {
    pub api_name: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

impl RoleUpdateRequest {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(api_name) = &self.api_name {
            require_non_empty("api_name", api_name)?;
        }
        if let Some(name) = &self.name {
            require_non_empty("name", name)?;
        }
        Ok(())
    }
}
