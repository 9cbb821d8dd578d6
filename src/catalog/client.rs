use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use super::{validate_meal_id, validate_name, CatalogService};
use crate::config::HttpConfig;
use crate::error::{CoreError, CoreResult};
use crate::http::{build_client, get_json, join_url};
use crate::recipes::raw::{CategoriesEnvelope, MealsEnvelope};
use crate::recipes::{RawCategory, RawMealRecord};

/// TheMealDB-backed catalog.
#[derive(Clone)]
pub struct MealDbClient {
    client: Client,
    base_url: String,
}

impl MealDbClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(cfg: &HttpConfig) -> Self {
        Self::new(build_client(cfg.timeout()), cfg.catalog_base_url.clone())
    }

    async fn meals(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> CoreResult<Option<Vec<RawMealRecord>>> {
        let url = join_url(&self.base_url, endpoint);
        let envelope: MealsEnvelope = get_json(&self.client, &url, query).await?;
        Ok(envelope.meals)
    }

    async fn first_meal(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
        what: &str,
    ) -> CoreResult<RawMealRecord> {
        self.meals(endpoint, query)
            .await?
            .and_then(|meals| meals.into_iter().next())
            .ok_or_else(|| CoreError::NotFound(what.to_string()))
    }
}

#[async_trait]
impl CatalogService for MealDbClient {
    #[instrument(skip(self))]
    async fn get_random_meal(&self) -> CoreResult<RawMealRecord> {
        self.first_meal("random.php", &[], "random meal").await
    }

    #[instrument(skip(self))]
    async fn get_meal_by_id(&self, id: &str) -> CoreResult<RawMealRecord> {
        let id = validate_meal_id(id)?;
        self.first_meal("lookup.php", &[("i", id)], &format!("meal {id}"))
            .await
    }

    #[instrument(skip(self))]
    async fn filter_by_category(&self, category: &str) -> CoreResult<Vec<RawMealRecord>> {
        let category = validate_name("category", category)?;
        let meals = self
            .meals("filter.php", &[("c", category)])
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("category {category}")))?;
        debug!(count = meals.len(), "category filtered");
        Ok(meals)
    }

    #[instrument(skip(self))]
    async fn filter_by_area(&self, area: &str) -> CoreResult<Vec<RawMealRecord>> {
        let area = validate_name("area", area)?;
        self.meals("filter.php", &[("a", area)])
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("area {area}")))
    }

    #[instrument(skip(self))]
    async fn search_by_name(&self, query: &str) -> CoreResult<Vec<RawMealRecord>> {
        Ok(self
            .meals("search.php", &[("s", query.trim())])
            .await?
            .unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn get_categories(&self) -> CoreResult<Vec<RawCategory>> {
        let url = join_url(&self.base_url, "categories.php");
        let envelope: CategoriesEnvelope = get_json(&self.client, &url, &[]).await?;
        envelope
            .categories
            .ok_or_else(|| CoreError::NotFound("categories".into()))
    }
}

#[cfg(test)]
mod client_tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::config::config_tests::lookup as env_lookup;

    fn teriyaki() -> Value {
        json!({
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken Casserole",
            "strCategory": "Chicken",
            "strInstructions": "Preheat oven.\nBake.",
            "strIngredient1": "soy sauce",
            "strMeasure1": "3/4 cup",
            "strIngredient2": null
        })
    }

    async fn lookup(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
        match q.get("i").map(String::as_str) {
            Some("52772") => Json(json!({ "meals": [teriyaki()] })),
            _ => Json(json!({ "meals": null })),
        }
    }

    async fn filter(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
        let hit = q.get("c").map(String::as_str) == Some("Chicken")
            || q.get("a").map(String::as_str) == Some("Japanese");
        if hit {
            Json(json!({ "meals": [
                { "idMeal": "52772", "strMeal": "Teriyaki Chicken Casserole", "strMealThumb": "t.jpg" },
                { "idMeal": "52795", "strMeal": "Chicken Handi", "strMealThumb": "h.jpg" }
            ]}))
        } else {
            Json(json!({ "meals": null }))
        }
    }

    async fn spawn_catalog() -> String {
        let app = Router::new()
            .route("/random.php", get(|| async { Json(json!({ "meals": [teriyaki()] })) }))
            .route("/lookup.php", get(lookup))
            .route("/filter.php", get(filter))
            .route("/search.php", get(|| async { Json(json!({ "meals": null })) }))
            .route(
                "/categories.php",
                get(|| async {
                    Json(json!({ "categories": [{
                        "idCategory": "1",
                        "strCategory": "Beef",
                        "strCategoryThumb": "beef.png",
                        "strCategoryDescription": "Beef is the culinary name for meat from cattle."
                    }]}))
                }),
            )
            .route("/broken/random.php", get(|| async { "<html>oops</html>" }))
            .route(
                "/down/random.php",
                get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client(base: &str) -> MealDbClient {
        MealDbClient::new(build_client(Duration::from_secs(5)), base)
    }

    #[tokio::test]
    async fn random_meal_is_returned_raw() {
        let base = spawn_catalog().await;
        let meal = client(&base).get_random_meal().await.expect("random meal");
        assert_eq!(meal.id(), "52772");
        assert_eq!(meal.ingredient(1), "soy sauce");
    }

    #[tokio::test]
    async fn built_from_looked_up_config() {
        let base = spawn_catalog().await;
        let cfg = HttpConfig::from_lookup(env_lookup(&[
            ("CATALOG_BASE_URL", base.as_str()),
            ("HTTP_TIMEOUT_SECS", "5"),
        ]))
        .expect("config loads");
        let meal = MealDbClient::from_config(&cfg)
            .get_meal_by_id("52772")
            .await
            .expect("lookup through configured client");
        assert_eq!(meal.name(), "Teriyaki Chicken Casserole");
    }

    #[tokio::test]
    async fn random_meals_issues_n_fetches() {
        let base = spawn_catalog().await;
        let meals = client(&base).get_random_meals(3).await.expect("batch");
        assert_eq!(meals.len(), 3);
    }

    #[tokio::test]
    async fn lookup_by_id() {
        let base = spawn_catalog().await;
        let c = client(&base);
        assert_eq!(c.get_meal_by_id("52772").await.unwrap().name(), "Teriyaki Chicken Casserole");
        assert!(matches!(
            c.get_meal_by_id("99999").await,
            Err(CoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn non_numeric_id_fails_before_any_request() {
        // Nothing listens here; a request would be a transport error.
        let c = client("http://127.0.0.1:1");
        assert!(matches!(
            c.get_meal_by_id("chicken").await,
            Err(CoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn category_and_area_filters() {
        let base = spawn_catalog().await;
        let c = client(&base);
        assert_eq!(c.filter_by_category("Chicken").await.unwrap().len(), 2);
        assert_eq!(c.filter_by_area("Japanese").await.unwrap().len(), 2);
        assert!(matches!(
            c.filter_by_category("Nope").await,
            Err(CoreError::NotFound(_))
        ));
        assert!(matches!(
            c.filter_by_category(" ").await,
            Err(CoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn search_without_hits_is_empty() {
        let base = spawn_catalog().await;
        assert!(client(&base).search_by_name("zzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn categories_are_listed() {
        let base = spawn_catalog().await;
        let cats = client(&base).get_categories().await.unwrap();
        assert_eq!(cats.len(), 1);
        assert_eq!(cats[0].name.as_deref(), Some("Beef"));
    }

    #[tokio::test]
    async fn undecodable_body_is_a_parse_error() {
        let base = spawn_catalog().await;
        let err = client(&format!("{base}/broken"))
            .get_random_meal()
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Parse(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn error_status_is_a_transport_error() {
        let base = spawn_catalog().await;
        let err = client(&format!("{base}/down"))
            .get_random_meal()
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Transport(_)), "got {err:?}");
    }
}
