//! Feedback HTTP handlers

use axum::{
    extract::State,
    response::Response,
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::models::FeedbackCreateRequest;
use crate::repositories::{FeedbackQuery, PaginatedRepository, Repository};
use crate::web::{
    extractors::{FeedbackFilterParams, FilterQuery, IdPath, PaginationParams, SearchParams},
    responses::{created, no_content, ok, PaginatedResponse},
    AppState,
};

/// List feedback, newest first
pub async fn list_feedback(
    State(state): State<AppState>,
    pagination: PaginationParams,
    search: SearchParams,
    FilterQuery(filter): FilterQuery<FeedbackFilterParams>,
) -> Result<Response, AppError> {
    let query = FeedbackQuery {
        base: search.to_query(),
        category: filter.category,
    };
    let page = state
        .feedback
        .find_paginated(query, pagination.page, pagination.limit)
        .await?;

    Ok(ok(PaginatedResponse::from(page)))
}

pub async fn get_feedback(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Response, AppError> {
    let feedback = state
        .feedback
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("feedback", id.to_string()))?;

    Ok(ok(feedback))
}

pub async fn create_feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackCreateRequest>,
) -> Result<Response, AppError> {
    request.validate()?;
    let feedback = state.feedback.create(request).await?;
    info!(
        "Received {} feedback {}",
        feedback.category.as_str(),
        feedback.id
    );

    Ok(created(feedback))
}

pub async fn delete_feedback(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Response, AppError> {
    state.feedback.delete(id).await?;

    Ok(no_content())
}
