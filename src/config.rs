use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CATALOG_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";
pub const DEFAULT_FAVORITES_API_URL: &str = "http://localhost:8080/api";

/// Outbound settings for the catalog and favorites clients.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub catalog_base_url: String,
    pub favorites_api_url: String,
    pub timeout_secs: u64,
}

impl HttpConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let timeout_secs = match var("HTTP_TIMEOUT_SECS") {
            Some(v) => v
                .parse::<u64>()
                .with_context(|| format!("HTTP_TIMEOUT_SECS must be a whole number, got {v:?}"))?,
            None => defaults.timeout_secs,
        };
        Ok(Self {
            catalog_base_url: var("CATALOG_BASE_URL").unwrap_or(defaults.catalog_base_url),
            favorites_api_url: var("FAVORITES_API_URL").unwrap_or(defaults.favorites_api_url),
            timeout_secs,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            catalog_base_url: DEFAULT_CATALOG_BASE_URL.into(),
            favorites_api_url: DEFAULT_FAVORITES_API_URL.into(),
            timeout_secs: 30,
        }
    }
}

/// Settings for the favorites store server.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Unset selects the in-memory favorites repository.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = match var("APP_PORT") {
            Some(v) => v
                .parse::<u16>()
                .with_context(|| format!("APP_PORT must be a port number, got {v:?}"))?,
            None => 8080,
        };
        Ok(Self {
            database_url: var("DATABASE_URL").filter(|v| !v.trim().is_empty()),
            host: var("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
        })
    }
}
