use std::sync::Arc;

use tracing::{instrument, warn};

use super::dto::FavoriteEntry;
use super::store::FavoritesStore;
use crate::error::{CoreError, CoreResult};

/// Local "is saved" state with an optimistic phase.
///
/// `begin` applies a tentative flip that is shown right away; the remote
/// outcome then either `confirm`s it or `rollback`s to the confirmed value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FavoriteFlag {
    confirmed: bool,
    tentative: Option<bool>,
}

impl FavoriteFlag {
    pub fn new(saved: bool) -> Self {
        Self {
            confirmed: saved,
            tentative: None,
        }
    }

    /// What the screen should show.
    pub fn displayed(&self) -> bool {
        self.tentative.unwrap_or(self.confirmed)
    }

    pub fn confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn is_pending(&self) -> bool {
        self.tentative.is_some()
    }

    /// Start a flip. Returns the target value, or `None` while another flip
    /// is still waiting on the store.
    pub fn begin(&mut self) -> Option<bool> {
        if self.tentative.is_some() {
            return None;
        }
        let target = !self.confirmed;
        self.tentative = Some(target);
        Some(target)
    }

    pub fn confirm(&mut self) {
        if let Some(target) = self.tentative.take() {
            self.confirmed = target;
        }
    }

    pub fn rollback(&mut self) {
        self.tentative = None;
    }
}

/// Talks to the favorites store on behalf of one signed-in user at a time.
/// Holds no cache; every query goes to the store.
#[derive(Clone)]
pub struct FavoritesCoordinator {
    store: Arc<dyn FavoritesStore>,
}

impl FavoritesCoordinator {
    pub fn new(store: Arc<dyn FavoritesStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn is_favorite(&self, user_id: &str, recipe_id: i64) -> CoreResult<bool> {
        require_user(user_id)?;
        let entries = self.store.list(user_id).await?;
        Ok(entries.iter().any(|f| f.recipe_id == recipe_id))
    }

    /// Initial flag for a recipe screen.
    pub async fn load_flag(&self, user_id: &str, recipe_id: i64) -> CoreResult<FavoriteFlag> {
        Ok(FavoriteFlag::new(self.is_favorite(user_id, recipe_id).await?))
    }

    /// Safe to repeat; the store de-duplicates.
    pub async fn add(&self, entry: &FavoriteEntry) -> CoreResult<()> {
        require_user(&entry.user_id)?;
        self.store.add(entry).await
    }

    /// Removing an absent entry succeeds.
    pub async fn remove(&self, user_id: &str, recipe_id: i64) -> CoreResult<()> {
        require_user(user_id)?;
        self.store.remove(user_id, recipe_id).await
    }

    /// Optimistic toggle: flip `flag` tentatively, call the store, then
    /// confirm or roll back. On failure the flag shows its previous value and
    /// the error is returned for the caller to report.
    #[instrument(skip(self, flag, entry), fields(user_id = %entry.user_id, recipe_id = entry.recipe_id))]
    pub async fn toggle(&self, flag: &mut FavoriteFlag, entry: &FavoriteEntry) -> CoreResult<bool> {
        let target = flag
            .begin()
            .ok_or_else(|| CoreError::Validation("a favorite toggle is already in flight".into()))?;

        let outcome = if target {
            self.add(entry).await
        } else {
            self.remove(&entry.user_id, entry.recipe_id).await
        };

        match outcome {
            Ok(()) => {
                flag.confirm();
                Ok(target)
            }
            Err(e) => {
                flag.rollback();
                warn!(error = %e, "favorite toggle rolled back");
                Err(e)
            }
        }
    }
}

fn require_user(user_id: &str) -> CoreResult<()> {
    if user_id.trim().is_empty() {
        return Err(CoreError::Validation("user id is required".into()));
    }
    Ok(())
}
