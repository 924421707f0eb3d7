//! Role HTTP handlers

use axum::{
    extract::State,
    response::Response,
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::models::{RoleCreateRequest, RoleUpdateRequest};
use crate::repositories::{PaginatedRepository, Repository, UpdatableRepository};
use crate::web::{
    extractors::{IdPath, PaginationParams, SearchParams},
    responses::{created, no_content, ok, PaginatedResponse},
    AppState,
};

pub async fn list_roles(
    State(state): State<AppState>,
    pagination: PaginationParams,
    search: SearchParams,
) -> Result<Response, AppError> {
    let page = state
        .roles
        .find_paginated(search.to_query(), pagination.page, pagination.limit)
        .await?;

    Ok(ok(PaginatedResponse::from(page)))
}

pub async fn get_role(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Response, AppError> {
    let role = state
        .roles
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("role", id.to_string()))?;

    Ok(ok(role))
}

pub async fn create_role(
    State(state): State<AppState>,
    Json(request): Json<RoleCreateRequest>,
) -> Result<Response, AppError> {
    request.validate()?;
    let role = state.roles.create(request).await?;
    info!("Created role {} ({})", role.api_name, role.id);

    Ok(created(role))
}

pub async fn update_role(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    Json(request): Json<RoleUpdateRequest>,
) -> Result<Response, AppError> {
    request.validate()?;
    let role = state.roles.update(id, request).await?;

    Ok(ok(role))
}

pub async fn delete_role(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Response, AppError> {
    state.roles.delete(id).await?;

    Ok(no_content())
}
