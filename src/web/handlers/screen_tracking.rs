//! Screen tracking HTTP handlers

use axum::{
    extract::State,
    response::Response,
    Json,
};
use tracing::debug;

use crate::errors::AppError;
use crate::models::ScreenViewCreateRequest;
use crate::repositories::{PaginatedRepository, Repository, ScreenViewQuery};
use crate::web::{
    extractors::{FilterQuery, IdPath, PaginationParams, ScreenViewFilterParams, SearchParams},
    responses::{created, no_content, ok, PaginatedResponse},
    AppState,
};

pub async fn list_screen_views(
    State(state): State<AppState>,
    pagination: PaginationParams,
    search: SearchParams,
    FilterQuery(filter): FilterQuery<ScreenViewFilterParams>,
) -> Result<Response, AppError> {
    let query = ScreenViewQuery {
        base: search.to_query(),
        screen_name: filter.screen_name,
    };
    let page = state
        .screen_views
        .find_paginated(query, pagination.page, pagination.limit)
        .await?;

    Ok(ok(PaginatedResponse::from(page)))
}

pub async fn get_screen_view(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Response, AppError> {
    let view = state
        .screen_views
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("screen view", id.to_string()))?;

    Ok(ok(view))
}

/// Record one screen view
pub async fn track_screen_view(
    State(state): State<AppState>,
    Json(request): Json<ScreenViewCreateRequest>,
) -> Result<Response, AppError> {
    request.validate()?;
    let view = state.screen_views.create(request).await?;
    debug!("Tracked view of {}", view.screen_name);

    Ok(created(view))
}

pub async fn delete_screen_view(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Response, AppError> {
    state.screen_views.delete(id).await?;

    Ok(no_content())
}

/// Per-screen view counts, busiest first
pub async fn screen_stats(State(state): State<AppState>) -> Result<Response, AppError> {
    let stats = state.screen_views.stats().await?;

    Ok(ok(stats))
}
