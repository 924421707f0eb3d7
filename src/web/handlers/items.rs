//! Item HTTP handlers

use axum::{
    extract::State,
    response::Response,
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::image_assets::AssetType;
use crate::models::{Item, ItemCreateRequest, ItemUpdateRequest};
use crate::repositories::{ItemQuery, PaginatedRepository, Repository, UpdatableRepository};
use crate::web::{
    extractors::{FilterQuery, IdPath, ItemFilterParams, PaginationParams, SearchParams},
    responses::{created, no_content, ok, PaginatedResponse},
    AppState,
};

/// List items with search, tag filter and pagination
pub async fn list_items(
    State(state): State<AppState>,
    pagination: PaginationParams,
    search: SearchParams,
    FilterQuery(filter): FilterQuery<ItemFilterParams>,
) -> Result<Response, AppError> {
    let query = ItemQuery {
        base: search.to_query(),
        tag: filter.tag,
    };
    let mut page = state
        .items
        .find_paginated(query, pagination.page, pagination.limit)
        .await?;
    for item in &mut page.items {
        attach_image_url(&state, item).await;
    }

    Ok(ok(PaginatedResponse::from(page)))
}

pub async fn get_item(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Response, AppError> {
    let mut item = state
        .items
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("item", id.to_string()))?;
    attach_image_url(&state, &mut item).await;

    Ok(ok(item))
}

pub async fn create_item(
    State(state): State<AppState>,
    Json(request): Json<ItemCreateRequest>,
) -> Result<Response, AppError> {
    request.validate()?;
    let mut item = state.items.create(request).await?;
    attach_image_url(&state, &mut item).await;
    info!("Created item {} ({})", item.api_name, item.id);

    Ok(created(item))
}

pub async fn update_item(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    Json(request): Json<ItemUpdateRequest>,
) -> Result<Response, AppError> {
    request.validate()?;
    let mut item = state.items.update(id, request).await?;
    attach_image_url(&state, &mut item).await;

    Ok(ok(item))
}

pub async fn delete_item(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Response, AppError> {
    state.items.delete(id).await?;
    info!("Deleted item {}", id);

    Ok(no_content())
}

async fn attach_image_url(state: &AppState, item: &mut Item) {
    item.image_url = state
        .asset_resolver
        .image_url(AssetType::Item, &item.normalized_key)
        .await;
}
