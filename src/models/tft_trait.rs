use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::metadata::Metadata;
use super::require_non_empty;
use crate::errors::{AppError, AppResult};

/// A trait (synergy) from a TFT set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TftTrait {
    pub id: Uuid,
    /// Upstream identifier, e.g. `TFT16_Huntress`
    pub api_name: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub set_number: Option<i32>,
    pub effects: Vec<TraitEffect>,
    pub normalized_key: String,
    /// Set only when an image file backs `normalized_key`
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One breakpoint of a trait
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitEffect {
    pub min_units: u32,
    pub max_units: u32,
    pub style: u32,
    #[serde(default)]
    pub variables: Metadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TftTraitCreateRequest {
    pub api_name: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub set_number: Option<i32>,
    #[serde(default)]
    pub effects: Vec<TraitEffect>,
}

impl TftTraitCreateRequest {
    pub fn validate(&self) -> AppResult<()> {
        require_non_empty("api_name", &self.api_name)?;
        require_non_empty("name", &self.name)?;
        validate_effects(&self.effects)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TftTraitUpdateRequest {
    pub api_name: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub set_number: Option<i32>,
    pub effects: Option<Vec<TraitEffect>>,
}

impl TftTraitUpdateRequest {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(api_name) = &self.api_name {
            require_non_empty("api_name", api_name)?;
        }
        if let Some(name) = &self.name {
            require_non_empty("name", name)?;
        }
        match &self.effects {
            Some(effects) => validate_effects(effects),
            None => Ok(()),
        }
    }
}

fn validate_effects(effects: &[TraitEffect]) -> AppResult<()> {
    for effect in effects {
        if effect.min_units > effect.max_units {
            return Err(AppError::validation(format!(
                "effect min_units ({}) exceeds max_units ({})",
                effect.min_units, effect.max_units
            )));
        }
    }
    Ok(())
}
