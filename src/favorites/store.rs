use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};

use super::dto::FavoriteEntry;
use crate::config::HttpConfig;
use crate::error::CoreResult;
use crate::http::{build_client, ensure_success, get_json, url_with_segments};

/// Remote store of bookmarks. Each call is a single request; the store owns
/// de-duplication by `(user_id, recipe_id)`.
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    async fn list(&self, user_id: &str) -> CoreResult<Vec<FavoriteEntry>>;
    async fn add(&self, entry: &FavoriteEntry) -> CoreResult<()>;
    async fn remove(&self, user_id: &str, recipe_id: i64) -> CoreResult<()>;
}

#[derive(Clone)]
pub struct HttpFavoritesStore {
    client: Client,
    base_url: String,
}

impl HttpFavoritesStore {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(cfg: &HttpConfig) -> Self {
        Self::new(build_client(cfg.timeout()), cfg.favorites_api_url.clone())
    }
}

#[async_trait]
impl FavoritesStore for HttpFavoritesStore {
    #[instrument(skip(self))]
    async fn list(&self, user_id: &str) -> CoreResult<Vec<FavoriteEntry>> {
        let url = url_with_segments(&self.base_url, &["favorites", user_id])?;
        get_json(&self.client, &url, &[]).await
    }

    #[instrument(skip(self, entry), fields(user_id = %entry.user_id, recipe_id = entry.recipe_id))]
    async fn add(&self, entry: &FavoriteEntry) -> CoreResult<()> {
        let url = url_with_segments(&self.base_url, &["favorites"])?;
        let response = self.client.post(&url).json(entry).send().await?;
        // A conflict means it is already there.
        if response.status() == StatusCode::CONFLICT {
            debug!("favorite already stored");
            return Ok(());
        }
        ensure_success(response)?;
        debug!("favorite stored");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, user_id: &str, recipe_id: i64) -> CoreResult<()> {
        let recipe_id = recipe_id.to_string();
        let url = url_with_segments(&self.base_url, &["favorites", user_id, recipe_id.as_str()])?;
        let response = self.client.delete(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("favorite was not stored");
            return Ok(());
        }
        ensure_success(response)?;
        debug!("favorite removed");
        Ok(())
    }
}
