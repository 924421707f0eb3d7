//! Trait HTTP handlers
//!
//! Besides CRUD, traits can be fetched by any spelling of their key
//! (`TFT16_Huntress`, `Huntress`, `huntress`) through `/traits/key/:key`.

use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::image_assets::AssetType;
use crate::models::{TftTrait, TftTraitCreateRequest, TftTraitUpdateRequest};
use crate::repositories::{
    PaginatedRepository, Repository, TftTraitQuery, UpdatableRepository,
};
use crate::web::{
    extractors::{FilterQuery, IdPath, PaginationParams, SearchParams, TraitFilterParams},
    responses::{created, no_content, ok, PaginatedResponse},
    AppState,
};

pub async fn list_traits(
    State(state): State<AppState>,
    pagination: PaginationParams,
    search: SearchParams,
    FilterQuery(filter): FilterQuery<TraitFilterParams>,
) -> Result<Response, AppError> {
    let query = TftTraitQuery {
        base: search.to_query(),
        set_number: filter.set_number,
    };
    let mut page = state
        .traits
        .find_paginated(query, pagination.page, pagination.limit)
        .await?;
    for tft_trait in &mut page.items {
        attach_image_url(&state, tft_trait).await;
    }

    Ok(ok(PaginatedResponse::from(page)))
}

pub async fn get_trait(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Response, AppError> {
    let mut tft_trait = state
        .traits
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("trait", id.to_string()))?;
    attach_image_url(&state, &mut tft_trait).await;

    Ok(ok(tft_trait))
}

/// Look a trait up by its raw upstream key
pub async fn get_trait_by_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    let mut tft_trait = state
        .traits
        .find_by_key(&key)
        .await?
        .ok_or_else(|| AppError::not_found("trait", key))?;
    attach_image_url(&state, &mut tft_trait).await;

    Ok(ok(tft_trait))
}

pub async fn create_trait(
    State(state): State<AppState>,
    Json(request): Json<TftTraitCreateRequest>,
) -> Result<Response, AppError> {
    request.validate()?;
    let mut tft_trait = state.traits.create(request).await?;
    attach_image_url(&state, &mut tft_trait).await;
    info!("Created trait {} ({})", tft_trait.api_name, tft_trait.id);

    Ok(created(tft_trait))
}

pub async fn update_trait(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    Json(request): Json<TftTraitUpdateRequest>,
) -> Result<Response, AppError> {
    request.validate()?;
    let mut tft_trait = state.traits.update(id, request).await?;
    attach_image_url(&state, &mut tft_trait).await;

    Ok(ok(tft_trait))
}

pub async fn delete_trait(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Response, AppError> {
    state.traits.delete(id).await?;
    info!("Deleted trait {}", id);

    Ok(no_content())
}

async fn attach_image_url(state: &AppState, tft_trait: &mut TftTrait) {
    tft_trait.image_url = state
        .asset_resolver
        .image_url(AssetType::Trait, &tft_trait.normalized_key)
        .await;
}
