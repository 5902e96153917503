use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::aggregator::DEFAULT_CHAT_MARKER;
use crate::error::{GmailError, Result};

/// Largest page the Gmail list endpoint will return
pub const MAX_PAGE_SIZE: u32 = 500;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub include_spam_trash: bool,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            include_spam_trash: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_chat_marker")]
    pub chat_marker: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            chat_marker: default_chat_marker(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub redirect_flow: bool,
}

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

fn default_format() -> String {
    "full".to_string()
}

fn default_chat_marker() -> String {
    DEFAULT_CHAT_MARKER.to_string()
}

impl Config {
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GmailError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| GmailError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;

        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.listing.page_size == 0 {
            return Err(GmailError::ConfigError(
                "listing.page_size must be at least 1".to_string(),
            ));
        }
        if self.listing.page_size > MAX_PAGE_SIZE {
            return Err(GmailError::ConfigError(format!(
                "listing.page_size cannot exceed {} (Gmail list limit)",
                MAX_PAGE_SIZE
            )));
        }

        match self.fetch.format.as_str() {
            "full" | "metadata" => {}
            other => {
                return Err(GmailError::ConfigError(format!(
                    "Invalid fetch.format: '{}'. Must be 'full' or 'metadata'",
                    other
                )));
            }
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}
