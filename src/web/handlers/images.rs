//! Image serving
//!
//! `GET /images/:asset_type/*key` hands the raw key to the asset resolver,
//! so CDN-style paths such as `maps/tft/icons/augments/hexcore/Bastion.TFT_Set13.tex`
//! work as well as plain names. The optional `ext` query parameter picks
//! the file extension; otherwise the asset type's default applies.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::errors::AppError;
use crate::image_assets::ImageExtension;
use crate::web::{extractors::FilterQuery, AppState};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageParams {
    pub ext: Option<String>,
}

pub async fn serve_image(
    State(state): State<AppState>,
    Path((asset_type, key)): Path<(String, String)>,
    FilterQuery(params): FilterQuery<ImageParams>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let extension = params
        .ext
        .as_deref()
        .map(str::parse::<ImageExtension>)
        .transpose()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let file = state
        .asset_resolver
        .resolve(&asset_type, &key, extension)
        .await?;

    let etag = format!("\"{:x}\"", Sha256::digest(&file.data));
    let cache_control = format!(
        "public, max-age={}",
        state.config.storage.image_cache_max_age
    );

    let not_modified = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| etag_matches(value, &etag));

    if not_modified {
        return Ok((
            StatusCode::NOT_MODIFIED,
            [(header::ETAG, etag), (header::CACHE_CONTROL, cache_control)],
        )
            .into_response());
    }

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CACHE_CONTROL, cache_control),
            (header::ETAG, etag),
        ],
        file.data,
    )
        .into_response())
}

/// Weak comparison of an `If-None-Match` header against our entity tag
fn etag_matches(if_none_match: &str, etag: &str) -> bool {
    if_none_match
        .split(',')
        .map(str::trim)
        .any(|candidate| candidate == "*" || candidate.trim_start_matches("W/") == etag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_etag_matching() {
        let etag = "\"abc\"";
        assert!(etag_matches("\"abc\"", etag));
        assert!(etag_matches("W/\"abc\"", etag));
        assert!(etag_matches("\"zzz\", \"abc\"", etag));
        assert!(etag_matches("*", etag));
        assert!(!etag_matches("\"abd\"", etag));
        assert!(!etag_matches("abc", etag));
    }
}
