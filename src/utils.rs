//! Utility functions for the TFT data API
//!
//! - DateTime parsing for values read back from SQLite
//! - Image URL generation for reference data responses
//! - Search pattern escaping for `LIKE` queries

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::image_assets::AssetType;

/// Parse datetime from SQLite format or RFC3339 format
pub fn parse_datetime(datetime_str: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(datetime_str) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(naive_dt) = NaiveDateTime::parse_from_str(datetime_str, "%Y-%m-%d %H:%M:%S") {
        return Ok(DateTime::from_naive_utc_and_offset(naive_dt, Utc));
    }

    Err(sqlx::Error::Decode(
        format!("Unable to parse datetime: {}", datetime_str).into(),
    ))
}

/// Relative URL under which the image for an already normalized key is served.
///
/// The key is left bare: the image route normalizes it again (a no-op) and
/// appends the type's default extension.
pub fn image_url(asset_type: AssetType, normalized_key: &str) -> String {
    format!(
        "/images/{}/{}",
        asset_type.dir_name(),
        urlencoding::encode(normalized_key)
    )
}

/// Build a `LIKE` pattern matching `term` anywhere, with `\` as escape
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
