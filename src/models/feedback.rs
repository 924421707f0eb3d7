use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

pub const MAX_MESSAGE_LENGTH: usize = 2000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Uuid,
    pub message: String,
    pub category: FeedbackCategory,
    pub contact: Option<String>,
    pub app_version: Option<String>,
    pub platform: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackCategory {
    Bug,
    Feature,
    #[default]
    General,
}

impl FeedbackCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackCategory::Bug => "bug",
            FeedbackCategory::Feature => "feature",
            FeedbackCategory::General => "general",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown feedback category '{0}'")]
pub struct UnknownFeedbackCategory(pub String);

impl FromStr for FeedbackCategory {
    type Err = UnknownFeedbackCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bug" => Ok(FeedbackCategory::Bug),
            "feature" => Ok(FeedbackCategory::Feature),
            "general" => Ok(FeedbackCategory::General),
            other => Err(UnknownFeedbackCategory(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackCreateRequest {
    pub message: String,
    #[serde(default)]
    pub category: FeedbackCategory,
    pub contact: Option<String>,
    pub app_version: Option<String>,
    pub platform: Option<String>,
}

impl FeedbackCreateRequest {
    pub fn validate(&self) -> AppResult<()> {
        let length = self.message.trim().chars().count();
        if length == 0 {
            return Err(AppError::validation("message must not be empty"));
        }
        if length > MAX_MESSAGE_LENGTH {
            return Err(AppError::validation(format!(
                "message must be at most {} characters",
                MAX_MESSAGE_LENGTH
            )));
        }
        Ok(())
    }
}
