use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variables with this prefix override file values,
/// e.g. `TFT_API__WEB__PORT=9000`.
pub const ENV_PREFIX: &str = "TFT_API";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub web: WebConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root of the `champions/`, `traits/`, ... image directories
    pub asset_root: PathBuf,
    /// `Cache-Control` max-age for served images, in seconds
    pub image_cache_max_age: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://./data/tft-data.db".to_string(),
                max_connections: Some(10),
            },
            web: WebConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            storage: StorageConfig {
                asset_root: PathBuf::from("./data/assets"),
                image_cache_max_age: 86400,
            },
        }
    }
}

impl Config {
    /// Load configuration from `config_file`, layering `TFT_API__*`
    /// environment variables on top.
    ///
    /// A missing file is created with the default configuration.
    pub fn load(config_file: &Path) -> Result<Self> {
        if !config_file.exists() {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            if let Some(parent) = config_file.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::create_dir_all(&default_config.storage.asset_root)?;
            std::fs::write(config_file, contents)?;
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(config_file).format(config::FileFormat::Toml))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
