use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::metadata::Metadata;
use super::require_non_empty;
use crate::errors::AppResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub api_name: String,
    pub name: String,
    pub description: Option<String>,
    /// Upstream CDN path of the icon texture
    pub icon: Option<String>,
    /// Api names of the component items this one is built from
    pub composition: Vec<String>,
    pub tags: Vec<String>,
    pub unique: bool,
    pub effects: Metadata,
    pub normalized_key: String,
    /// Set only when an image file backs `normalized_key`
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCreateRequest {
    pub api_name: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    #[serde(default)]
    pub composition: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub effects: Metadata,
}

impl ItemCreateRequest {
    pub fn validate(&self) -> AppResult<()> {
        require_non_empty("api_name", &self.api_name)?;
        require_non_empty("name", &self.name)
    }
}

/// Partial update, absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemUpdateRequest {
    pub api_name: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub composition: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub unique: Option<bool>,
    pub effects: Option<Metadata>,
}

impl ItemUpdateRequest {
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
