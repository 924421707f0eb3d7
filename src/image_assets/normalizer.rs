//! Asset key normalization
//!
//! Upstream data refers to the same icon in several shapes: bare api names
//! (`TFT16_Huntress`), display names (`Darkin Weapon`) and CDN texture paths
//! (`ASSETS/Maps/TFT/Icons/Augments/Hexcore/Foo.TFT_Set16.tex`). Every shape
//! is reduced to the lowercase filename stem used on disk.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static TRAIT_SET_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^tft[0-9]+_").expect("valid trait prefix pattern"));

static CDN_FILE_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(tex|png|jpg|jpeg)$").expect("valid extension pattern"));

static CDN_SET_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.tft_set[0-9]+$").expect("valid set suffix pattern"));

/// Category of visual asset, one directory per variant under the asset root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Champion,
    ChampionSplash,
    Trait,
    Augment,
    Item,
}

impl AssetType {
    pub const ALL: [AssetType; 5] = [
        AssetType::Champion,
        AssetType::ChampionSplash,
        AssetType::Trait,
        AssetType::Augment,
        AssetType::Item,
    ];

    /// Directory name under the asset root
    pub fn dir_name(self) -> &'static str {
        match self {
            AssetType::Champion => "champions",
            AssetType::ChampionSplash => "championsplashes",
            AssetType::Trait => "traits",
            AssetType::Augment => "augments",
            AssetType::Item => "items",
        }
    }

    /// Extension used when the caller does not ask for one
    pub fn default_extension(self) -> &'static str {
        match self {
            AssetType::ChampionSplash => "jpg",
            _ => "png",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Returned when a string names none of the asset directories
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown asset type '{0}'")]
pub struct UnknownAssetType(pub String);

impl FromStr for AssetType {
    type Err = UnknownAssetType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        AssetType::ALL
            .into_iter()
            .find(|t| t.dir_name() == lowered)
            .ok_or_else(|| UnknownAssetType(s.to_string()))
    }
}

/// Reduce a raw key to the canonical filename stem for `asset_type`.
///
/// Never fails: garbage in yields an empty or near-empty key, and the
/// resolver reports that as a missing asset. Applying it to its own output
/// returns the same string.
pub fn normalize_key(asset_type: AssetType, raw: &str) -> String {
    match asset_type {
        AssetType::Champion | AssetType::ChampionSplash => raw.to_lowercase(),
        AssetType::Trait => normalize_trait_key(raw),
        AssetType::Augment => normalize_cdn_key(raw),
        // Same rule as augments today; item call sites are kept apart in
        // case item icons ever need a different suffix pattern.
        AssetType::Item => normalize_cdn_key(raw),
    }
}

fn normalize_trait_key(raw: &str) -> String {
    let mut key: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    while let Some(prefix) = TRAIT_SET_PREFIX.find(&key) {
        key.replace_range(..prefix.end(), "");
    }

    key
}

fn normalize_cdn_key(raw: &str) -> String {
    if !raw.contains(['/', '\\']) {
        return raw.to_lowercase();
    }

    let file_name = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let stem = CDN_FILE_EXTENSION.replace(file_name, "");
    let stem = CDN_SET_SUFFIX.replace(&stem, "");
    stem.to_lowercase()
}
