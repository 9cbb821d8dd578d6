use tracing::{instrument, warn};

use super::CatalogService;
use crate::recipes::{normalize, normalize_all, CategoryCard, Recipe};

/// Random recipes shown on the home screen.
pub const HOME_FEED_RANDOM_MEALS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeFeed {
    pub categories: Vec<CategoryCard>,
    pub recipes: Vec<Recipe>,
    pub featured: Option<Recipe>,
    pub selected_category: Option<String>,
}

/// Initial load / pull-to-refresh.
///
/// Categories, random recipes and the featured recipe are fetched together.
/// All-or-nothing: if any of the three calls fails the feed comes back with no
/// recipes, even when the other two succeeded. The same holds when nothing was
/// selected yet and the catalog lists no categories to select.
#[instrument(skip(catalog))]
pub async fn load_home_feed<C>(catalog: &C, selected_category: Option<String>) -> HomeFeed
where
    C: CatalogService + ?Sized,
{
    let loaded = tokio::try_join!(
        catalog.get_categories(),
        catalog.get_random_meals(HOME_FEED_RANDOM_MEALS),
        catalog.get_random_meal(),
    );

    let (categories, random_meals, featured) = match loaded {
        Ok(parts) => parts,
        Err(e) => {
            warn!(error = %e, "home feed load failed; clearing recipes");
            return HomeFeed {
                selected_category,
                ..HomeFeed::default()
            };
        }
    };

    let categories: Vec<CategoryCard> = categories
        .into_iter()
        .enumerate()
        .map(|(i, raw)| CategoryCard::from_raw(i, raw))
        .collect();
    let selected_category = match selected_category {
        Some(name) => name,
        None => match categories.first() {
            Some(first) => first.name.clone(),
            None => {
                warn!("home feed has no categories to select; clearing recipes");
                return HomeFeed::default();
            }
        },
    };

    HomeFeed {
        recipes: normalize_all(random_meals.iter().map(Some)),
        featured: normalize(Some(&featured)),
        categories,
        selected_category: Some(selected_category),
    }
}

/// Recipes for one category; any failure is an empty list.
#[instrument(skip(catalog))]
pub async fn load_category_feed<C>(catalog: &C, category: &str) -> Vec<Recipe>
where
    C: CatalogService + ?Sized,
{
    match catalog.filter_by_category(category).await {
        Ok(meals) => normalize_all(meals.iter().map(Some)),
        Err(e) => {
            warn!(error = %e, "category load failed");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod feed_tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::{CoreError, CoreResult};
    use crate::recipes::{RawCategory, RawMealRecord};

    #[derive(Default)]
    struct FakeCatalog {
        fail_categories: bool,
        fail_random_batch: bool,
        fail_featured: bool,
        no_categories: bool,
    }

    fn meal(id: &str, title: &str) -> RawMealRecord {
        RawMealRecord::new().with("idMeal", id).with("strMeal", title)
    }

    #[async_trait]
    impl CatalogService for FakeCatalog {
        async fn get_random_meal(&self) -> CoreResult<RawMealRecord> {
            if self.fail_featured {
                return Err(CoreError::Transport("timeout".into()));
            }
            Ok(meal("52959", "Baked salmon with fennel & tomatoes"))
        }
        async fn get_random_meals(&self, n: usize) -> CoreResult<Vec<RawMealRecord>> {
            if self.fail_random_batch {
                return Err(CoreError::Transport("connection reset".into()));
            }
            Ok((0..n).map(|i| meal(&i.to_string(), "Kumpir")).collect())
        }
        async fn get_meal_by_id(&self, id: &str) -> CoreResult<RawMealRecord> {
            Ok(meal(id, "Wontons"))
        }
        async fn filter_by_category(&self, category: &str) -> CoreResult<Vec<RawMealRecord>> {
            if category == "Seafood" {
                Ok(vec![meal("1", "Fish pie"), meal("2", "Kedgeree")])
            } else {
                Err(CoreError::NotFound(category.into()))
            }
        }
        async fn filter_by_area(&self, _: &str) -> CoreResult<Vec<RawMealRecord>> {
            Ok(vec![])
        }
        async fn search_by_name(&self, _: &str) -> CoreResult<Vec<RawMealRecord>> {
            Ok(vec![])
        }
        async fn get_categories(&self) -> CoreResult<Vec<RawCategory>> {
            if self.fail_categories {
                return Err(CoreError::Parse("bad json".into()));
            }
            if self.no_categories {
                return Ok(vec![]);
            }
            Ok(vec![
                RawCategory {
                    name: Some("Beef".into()),
                    ..RawCategory::default()
                },
                RawCategory {
                    name: Some("Seafood".into()),
                    ..RawCategory::default()
                },
            ])
        }
    }

    #[tokio::test]
    async fn successful_load_fills_everything() {
        let feed = load_home_feed(&FakeCatalog::default(), None).await;
        assert_eq!(feed.categories.len(), 2);
        assert_eq!(feed.categories[1].id, 2);
        assert_eq!(feed.recipes.len(), HOME_FEED_RANDOM_MEALS);
        assert_eq!(
            feed.featured.map(|r| r.title).as_deref(),
            Some("Baked salmon with fennel & tomatoes")
        );
        assert_eq!(feed.selected_category.as_deref(), Some("Beef"));
    }

    #[tokio::test]
    async fn previous_selection_is_kept() {
        let feed = load_home_feed(&FakeCatalog::default(), Some("Seafood".into())).await;
        assert_eq!(feed.selected_category.as_deref(), Some("Seafood"));
    }

    #[tokio::test]
    async fn one_failed_call_empties_the_whole_feed() {
        let catalog = FakeCatalog {
            fail_random_batch: true,
            ..FakeCatalog::default()
        };
        let feed = load_home_feed(&catalog, None).await;
        // Categories and featured succeeded but are discarded too.
        assert!(feed.recipes.is_empty());
        assert!(feed.categories.is_empty());
        assert!(feed.featured.is_none());
    }

    #[tokio::test]
    async fn failed_categories_or_featured_also_empty_the_feed() {
        for catalog in [
            FakeCatalog {
                fail_categories: true,
                ..FakeCatalog::default()
            },
            FakeCatalog {
                fail_featured: true,
                ..FakeCatalog::default()
            },
        ] {
            let feed = load_home_feed(&catalog, None).await;
            assert!(feed.recipes.is_empty());
        }
    }

    #[tokio::test]
    async fn empty_category_list_without_selection_clears_recipes() {
        let catalog = FakeCatalog {
            no_categories: true,
            ..FakeCatalog::default()
        };
        let feed = load_home_feed(&catalog, None).await;
        assert!(feed.recipes.is_empty());
        assert!(feed.featured.is_none());
        assert!(feed.selected_category.is_none());

        // An existing selection needs no first category, so the load goes through.
        let feed = load_home_feed(&catalog, Some("Seafood".into())).await;
        assert!(feed.categories.is_empty());
        assert_eq!(feed.recipes.len(), HOME_FEED_RANDOM_MEALS);
        assert_eq!(feed.selected_category.as_deref(), Some("Seafood"));
    }

    #[tokio::test]
    async fn category_feed_normalizes_or_empties() {
        let catalog = FakeCatalog::default();
        let seafood = load_category_feed(&catalog, "Seafood").await;
        assert_eq!(seafood.len(), 2);
        assert_eq!(seafood[0].title, "Fish pie");
        assert!(load_category_feed(&catalog, "Nope").await.is_empty());
    }

    #[tokio::test]
    async fn works_through_a_trait_object() {
        let catalog: Box<dyn CatalogService> = Box::new(FakeCatalog::default());
        let feed = load_home_feed(catalog.as_ref(), None).await;
        assert_eq!(feed.recipes.len(), 3);
    }
}
