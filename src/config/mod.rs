// cabindesk/src/config/mod.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use url::Url;

use crate::cabins::PhotoLinks;

const DEFAULT_BUCKET_NAME: &str = "cabin-images";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

// Structs for deserializing config.json
#[derive(Debug, Clone, Deserialize)]
pub struct JsonStorageConfig {
    pub base_url: Option<String>,
    pub endpoint_url: Option<String>,
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub bucket_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawJsonConfig {
    pub database_url: Option<String>,
    pub max_connections: Option<u32>,
    pub storage: Option<JsonStorageConfig>,
}

// Application's internal configuration structs
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Project URL that public photo references are built from.
    pub base_url: String,
    /// S3-compatible endpoint used for uploads and removals.
    pub endpoint_url: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket_name: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load_from_json(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;
        let raw_json_config: RawJsonConfig = serde_json::from_str(&config_content)
            .with_context(|| {
                format!(
                    "Failed to parse JSON from config file at {}",
                    config_path.display()
                )
            })?;
        Self::from_raw(raw_json_config)
    }

    pub fn from_raw(raw_config: RawJsonConfig) -> Result<Self> {
        let database_url = raw_config
            .database_url
            .filter(|s| !s.trim().is_empty())
            .context("database_url must be set in config.json")?;

        let max_connections = raw_config.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS);
        if max_connections == 0 {
            return Err(anyhow::anyhow!("max_connections must be at least 1 in config.json."));
        }

        let storage_raw = raw_config
            .storage
            .context("storage must be defined in config.json")?;

        Ok(AppConfig {
            database_url,
            max_connections,
            storage: load_storage_config(storage_raw)?,
        })
    }

    pub fn photo_links(&self) -> PhotoLinks {
        PhotoLinks::new(&self.storage.base_url, &self.storage.bucket_name)
    }
}

fn load_storage_config(storage_raw: JsonStorageConfig) -> Result<StorageConfig> {
    if let (Some(base_url), Some(endpoint_url), Some(region), Some(access_key_id), Some(secret_access_key)) = (
        non_empty(storage_raw.base_url),
        non_empty(storage_raw.endpoint_url),
        non_empty(storage_raw.region),
        non_empty(storage_raw.access_key_id),
        non_empty(storage_raw.secret_access_key),
    ) {
        check_http_url("storage.base_url", &base_url)?;
        check_http_url("storage.endpoint_url", &endpoint_url)?;

        Ok(StorageConfig {
            base_url,
            endpoint_url,
            region,
            access_key_id,
            secret_access_key,
            bucket_name: non_empty(storage_raw.bucket_name)
                .unwrap_or_else(|| DEFAULT_BUCKET_NAME.to_string()),
        })
    } else {
        Err(anyhow::anyhow!(
            "storage in config.json is missing required fields (base_url, endpoint_url, region, access_key_id, secret_access_key) or has them empty."
        ))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn check_http_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).with_context(|| format!("{} is not a valid URL: {}", field, value))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(anyhow::anyhow!("{} must be an http(s) URL: {}", field, value));
    }
    Ok(())
}
