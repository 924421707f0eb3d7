use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tokio::fs;
use tracing::debug;

use super::normalizer::{normalize_key, AssetType};
use crate::errors::{AssetError, AssetResult};
use crate::utils;

/// Image extensions the resolver accepts from callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageExtension {
    Png,
    Jpg,
    Jpeg,
}

impl ImageExtension {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageExtension::Png => "png",
            ImageExtension::Jpg => "jpg",
            ImageExtension::Jpeg => "jpeg",
        }
    }
}

impl fmt::Display for ImageExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned for any extension other than png, jpg or jpeg
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported image extension '{0}'")]
pub struct UnsupportedExtension(pub String);

impl FromStr for ImageExtension {
    type Err = UnsupportedExtension;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(ImageExtension::Png),
            "jpg" => Ok(ImageExtension::Jpg),
            "jpeg" => Ok(ImageExtension::Jpeg),
            other => Err(UnsupportedExtension(other.to_string())),
        }
    }
}

/// A resolved image held fully in memory
#[derive(Debug, Clone)]
pub struct AssetFile {
    pub data: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
}

/// Resolves `(type, key, extension)` to image bytes under a fixed root.
///
/// Layout: `<asset_root>/<type dir>/<normalized key>.<ext>`. The directory
/// tree is produced by the icon download job and only read here.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    asset_root: PathBuf,
}

impl AssetResolver {
    pub fn new(asset_root: PathBuf) -> Self {
        Self { asset_root }
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    /// Resolve an asset whose type arrives as an untrusted string
    pub async fn resolve(
        &self,
        asset_type: &str,
        key: &str,
        extension: Option<ImageExtension>,
    ) -> AssetResult<AssetFile> {
        let asset_type: AssetType = asset_type.parse().map_err(|_| {
            debug!("Rejected image lookup for unknown asset type '{}'", asset_type);
            AssetError::invalid_type(asset_type, key.to_lowercase())
        })?;

        self.resolve_typed(asset_type, key, extension).await
    }

    pub async fn resolve_typed(
        &self,
        asset_type: AssetType,
        key: &str,
        extension: Option<ImageExtension>,
    ) -> AssetResult<AssetFile> {
        let normalized_key = normalize_key(asset_type, key);
        let extension = extension
            .map(ImageExtension::as_str)
            .unwrap_or_else(|| asset_type.default_extension());

        let Some(file_path) = self.file_path(asset_type, &normalized_key, extension) else {
            debug!(
                "Refusing unsafe image key '{}' for {}",
                normalized_key, asset_type
            );
            return Err(AssetError::missing(asset_type.dir_name(), normalized_key));
        };

        if !fs::try_exists(&file_path).await.unwrap_or(false) {
            debug!("Image not found at {}", file_path.display());
            return Err(AssetError::missing(asset_type.dir_name(), normalized_key));
        }

        let data = match fs::read(&file_path).await {
            Ok(data) => data,
            Err(e) => {
                debug!("Failed to read image {}: {}", file_path.display(), e);
                return Err(AssetError::missing(asset_type.dir_name(), normalized_key));
            }
        };

        Ok(AssetFile {
            data,
            content_type: content_type_for(extension),
            file_name: format!("{}.{}", normalized_key, extension),
        })
    }

    /// Whether a file backs `key` for `asset_type`
    pub async fn exists(
        &self,
        asset_type: AssetType,
        key: &str,
        extension: Option<ImageExtension>,
    ) -> bool {
        let normalized_key = normalize_key(asset_type, key);
        let extension = extension
            .map(ImageExtension::as_str)
            .unwrap_or_else(|| asset_type.default_extension());

        match self.file_path(asset_type, &normalized_key, extension) {
            Some(path) => fs::try_exists(path).await.unwrap_or(false),
            None => false,
        }
    }

    /// Route serving `key` with the default extension, when a file backs it
    pub async fn image_url(&self, asset_type: AssetType, key: &str) -> Option<String> {
        if !self.exists(asset_type, key, None).await {
            return None;
        }
        Some(utils::image_url(asset_type, &normalize_key(asset_type, key)))
    }

    /// Build the on-disk path, or `None` when the key would leave its directory
    fn file_path(
        &self,
        asset_type: AssetType,
        normalized_key: &str,
        extension: &str,
    ) -> Option<PathBuf> {
        if normalized_key.is_empty()
            || normalized_key.contains(['/', '\\'])
            || normalized_key.contains("..")
        {
            return None;
        }

        Some(
            self.asset_root
                .join(asset_type.dir_name())
                .join(format!("{}.{}", normalized_key, extension)),
        )
    }
}

fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        _ => "image/png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AssetNotFoundReason;
    use tempfile::TempDir;

    fn write_asset(root: &Path, dir: &str, file: &str, data: &[u8]) {
        let dir = root.join(dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(file), data).unwrap();
    }

    fn resolver_with_fixtures() -> (TempDir, AssetResolver) {
        let temp = TempDir::new().unwrap();
        write_asset(temp.path(), "championsplashes", "tft16_tristana.jpg", b"splash");
        write_asset(temp.path(), "champions", "tft16_tristana.png", b"portrait");
        write_asset(temp.path(), "traits", "huntress.png", b"trait");
        write_asset(temp.path(), "traits", "darkinweapon.jpeg", b"darkin");
        write_asset(temp.path(), "augments", "foo.png", b"augment");
        let resolver = AssetResolver::new(temp.path().to_path_buf());
        (temp, resolver)
    }

    #[tokio::test]
    async fn test_splash_defaults_to_jpg() {
        let (_temp, resolver) = resolver_with_fixtures();

        let file = resolver
            .resolve("championsplashes", "TFT16_Tristana", None)
            .await
            .unwrap();

        assert_eq!(file.data, b"splash");
        assert_eq!(file.content_type, "image/jpeg");
        assert_eq!(file.file_name, "tft16_tristana.jpg");
    }

    #[tokio::test]
    async fn test_trait_with_explicit_png() {
        let (_temp, resolver) = resolver_with_fixtures();

        let file = resolver
            .resolve("traits", "Huntress", Some(ImageExtension::Png))
            .await
            .unwrap();

        assert_eq!(file.data, b"trait");
        assert_eq!(file.content_type, "image/png");
        assert_eq!(file.file_name, "huntress.png");
    }

    #[tokio::test]
    async fn test_trait_key_is_normalized_before_lookup() {
        let (_temp, resolver) = resolver_with_fixtures();

        let file = resolver
            .resolve("traits", "TFT16_Darkin Weapon", Some(ImageExtension::Jpeg))
            .await
            .unwrap();

        assert_eq!(file.content_type, "image/jpeg");
        assert_eq!(file.data, b"darkin");
    }

    #[tokio::test]
    async fn test_augment_cdn_path() {
        let (_temp, resolver) = resolver_with_fixtures();

        let file = resolver
            .resolve(
                "augments",
                "ASSETS/Maps/TFT/Icons/Augments/Foo.TFT_Set16.tex",
                None,
            )
            .await
            .unwrap();

        assert_eq!(file.data, b"augment");
        assert_eq!(file.content_type, "image/png");
    }

    #[tokio::test]
    async fn test_unknown_type_is_not_found() {
        let (_temp, resolver) = resolver_with_fixtures();

        let error = resolver.resolve("emotes", "Huntress", None).await.unwrap_err();

        assert_eq!(error.reason(), AssetNotFoundReason::InvalidType);
    }

    #[tokio::test]
    async fn test_missing_file_reports_normalized_key() {
        let (_temp, resolver) = resolver_with_fixtures();

        let error = resolver
            .resolve("traits", "TFT16_Bastion", None)
            .await
            .unwrap_err();

        assert_eq!(
            error,
            AssetError::NotFound {
                reason: AssetNotFoundReason::AssetMissing,
                asset_type: "traits".to_string(),
                normalized_key: "bastion".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_wrong_extension_is_missing() {
        let (_temp, resolver) = resolver_with_fixtures();

        let error = resolver
            .resolve("championsplashes", "TFT16_Tristana", Some(ImageExtension::Png))
            .await
            .unwrap_err();

        assert_eq!(error.reason(), AssetNotFoundReason::AssetMissing);
    }

    #[tokio::test]
    async fn test_traversal_keys_never_leave_the_root() {
        let temp = TempDir::new().unwrap();
        write_asset(temp.path(), "", "secret.png", b"secret");
        let resolver = AssetResolver::new(temp.path().join("root"));
        write_asset(resolver.asset_root(), "champions", "placeholder.png", b"x");

        let error = resolver
            .resolve("champions", "../../secret", None)
            .await
            .unwrap_err();
        assert_eq!(error.reason(), AssetNotFoundReason::AssetMissing);

        let error = resolver.resolve("champions", "..", None).await.unwrap_err();
        assert_eq!(error.reason(), AssetNotFoundReason::AssetMissing);
    }

    #[tokio::test]
    async fn test_empty_key_is_missing() {
        let (_temp, resolver) = resolver_with_fixtures();

        let error = resolver.resolve("items", "", None).await.unwrap_err();
        assert_eq!(error.reason(), AssetNotFoundReason::AssetMissing);
    }

    #[tokio::test]
    async fn test_exists() {
        let (_temp, resolver) = resolver_with_fixtures();

        assert!(resolver.exists(AssetType::Trait, "TFT16_Huntress", None).await);
        assert!(!resolver.exists(AssetType::Item, "TFT_Item_BFSword", None).await);
    }

    #[tokio::test]
    async fn test_image_url_only_for_backed_keys() {
        let (_temp, resolver) = resolver_with_fixtures();

        assert_eq!(
            resolver.image_url(AssetType::Trait, "TFT16_Huntress").await,
            Some("/images/traits/huntress".to_string())
        );
        assert_eq!(resolver.image_url(AssetType::Trait, "TFT16_Bastion").await, None);
        assert_eq!(resolver.image_url(AssetType::Augment, "").await, None);
    }

    #[test]
    fn test_extension_parsing() {
        assert_eq!("PNG".parse::<ImageExtension>(), Ok(ImageExtension::Png));
        assert_eq!("jpeg".parse::<ImageExtension>(), Ok(ImageExtension::Jpeg));
        assert_eq!(
            "GIF".parse::<ImageExtension>(),
            Err(UnsupportedExtension("gif".to_string()))
        );
    }
}
