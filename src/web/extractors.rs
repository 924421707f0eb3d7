//! Request extractors and validation
//!
//! This module provides custom extractors for request validation,
//! pagination parameters, and the per-resource list filters.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use uuid::Uuid;

use super::responses::{validation_error, ApiResponse, ValidationErrorResponse};
use crate::errors::AppError;
use crate::models::FeedbackCategory;
use crate::repositories::QueryParams;

/// Largest page size a client may request
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Pagination parameters from query string
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    50
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PaginationParams {
    /// Validate pagination parameters
    pub fn validate(&self) -> Result<(), Vec<ValidationErrorResponse>> {
        let mut errors = Vec::new();

        if self.page < 1 {
            errors.push(ValidationErrorResponse {
                field: "page".to_string(),
                message: "Page must be >= 1".to_string(),
            });
        }

        if self.limit < 1 || self.limit > MAX_PAGE_SIZE {
            errors.push(ValidationErrorResponse {
                field: "limit".to_string(),
                message: format!("Limit must be between 1 and {}", MAX_PAGE_SIZE),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PaginationParams
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params): Query<PaginationParams> = Query::from_request_parts(parts, state)
            .await
            .map_err(|_| bad_query("Invalid pagination parameters"))?;

        params.validate().map_err(validation_error)?;

        Ok(params)
    }
}

/// Search parameters from query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub search: Option<String>,
}

impl SearchParams {
    /// Repository query carrying the search term
    pub fn to_query(&self) -> QueryParams {
        match &self.search {
            Some(term) => QueryParams::new().search(term.as_str()),
            None => QueryParams::new(),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SearchParams
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params): Query<SearchParams> = Query::from_request_parts(parts, state)
            .await
            .map_err(|_| bad_query("Invalid search parameters"))?;

        Ok(params)
    }
}

/// `:id` path segment parsed as a UUID
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<Uuid>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::validation(format!("Invalid id: {}", rejection.body_text()))
            })?;

        Ok(Self(id))
    }
}

/// Query string filters whose rejections use the API error envelope
#[derive(Debug, Clone, Default)]
pub struct FilterQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for FilterQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;

        Ok(Self(params))
    }
}

/// Item list filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemFilterParams {
    pub tag: Option<String>,
}

/// Trait list filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TraitFilterParams {
    pub set_number: Option<i32>,
}

/// Feedback list filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackFilterParams {
    pub category: Option<FeedbackCategory>,
}

/// Screen view list filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScreenViewFilterParams {
    pub screen_name: Option<String>,
}

fn bad_query(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error(message.to_string())),
    )
        .into_response()
}
