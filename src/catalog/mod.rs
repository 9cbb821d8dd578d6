pub mod client;
pub mod feed;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::warn;

use crate::error::{CoreError, CoreResult};
use crate::recipes::{RawCategory, RawMealRecord};

pub use client::MealDbClient;
pub use feed::{load_category_feed, load_home_feed, HomeFeed};

/// Read-only access to the external recipe catalog. Every call goes to the
/// network; nothing is retried or cached here.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn get_random_meal(&self) -> CoreResult<RawMealRecord>;

    /// `n` independent random fetches issued together. A failed slot is
    /// dropped, so the result may hold fewer than `n` records.
    async fn get_random_meals(&self, n: usize) -> CoreResult<Vec<RawMealRecord>> {
        let results = join_all((0..n).map(|_| self.get_random_meal())).await;
        let mut meals = Vec::with_capacity(n);
        for (slot, result) in results.into_iter().enumerate() {
            match result {
                Ok(meal) => meals.push(meal),
                Err(e) => warn!(slot, error = %e, "random meal fetch failed; dropping slot"),
            }
        }
        Ok(meals)
    }

    async fn get_meal_by_id(&self, id: &str) -> CoreResult<RawMealRecord>;

    async fn filter_by_category(&self, category: &str) -> CoreResult<Vec<RawMealRecord>>;

    async fn filter_by_area(&self, area: &str) -> CoreResult<Vec<RawMealRecord>>;

    /// Name search; no match is an empty list rather than an error.
    async fn search_by_name(&self, query: &str) -> CoreResult<Vec<RawMealRecord>>;

    async fn get_categories(&self) -> CoreResult<Vec<RawCategory>>;
}

/// Catalog ids are decimal strings.
pub fn validate_meal_id(id: &str) -> CoreResult<&str> {
    let id = id.trim();
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::Validation(format!(
            "meal id must be numeric, got {id:?}"
        )));
    }
    Ok(id)
}

pub(crate) fn validate_name<'a>(what: &str, name: &'a str) -> CoreResult<&'a str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation(format!("{what} must not be empty")));
    }
    Ok(name)
}
