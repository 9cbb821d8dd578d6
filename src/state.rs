use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::config::AppConfig;
use crate::favorites::repo::{FavoritesRepo, MemoryFavoritesRepo, PgFavoritesRepo};

#[derive(Clone)]
pub struct AppState {
    pub favorites: Arc<dyn FavoritesRepo>,
}

impl AppState {
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let favorites = match config.database_url.as_deref() {
            Some(url) => {
                let db = PgPoolOptions::new()
                    .max_connections(10)
                    .connect(url)
                    .await
                    .context("connect to database")?;

                sqlx::migrate!("./migrations")
                    .run(&db)
                    .await
                    .context("run migrations")?;
                Arc::new(PgFavoritesRepo::new(db)) as Arc<dyn FavoritesRepo>
            }
            None => {
                tracing::warn!("DATABASE_URL not set; favorites are kept in memory");
                Arc::new(MemoryFavoritesRepo::new()) as Arc<dyn FavoritesRepo>
            }
        };

        Ok(Self::from_parts(favorites))
    }

    pub fn from_parts(favorites: Arc<dyn FavoritesRepo>) -> Self {
        Self { favorites }
    }

    /// In-memory state for tests.
    pub fn fake() -> Self {
        Self::from_parts(Arc::new(MemoryFavoritesRepo::new()))
    }
}

#[cfg(test)]
mod state_tests {
    use super::*;

    #[tokio::test]
    async fn no_database_url_selects_memory_repo() {
        let config = AppConfig {
            database_url: None,
            host: "127.0.0.1".into(),
            port: 0,
        };
        let state = AppState::init(&config).await.expect("memory state");
        assert!(state.favorites.list_by_user("u1").await.unwrap().is_empty());
    }
}
