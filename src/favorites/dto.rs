use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::catalog::validate_meal_id;
use crate::error::{CoreError, CoreResult};
use crate::recipes::Recipe;

/// Wire shape of a bookmark: `{userId, recipeId, title, image, cookTime, servings}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub user_id: String,
    pub recipe_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub cook_time: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub servings: String,
}

impl FavoriteEntry {
    /// Bookmark for a normalized recipe. Display fields are copied verbatim.
    pub fn from_recipe(user_id: &str, recipe: &Recipe) -> CoreResult<Self> {
        let recipe_id = parse_recipe_id(&recipe.id)?;
        Ok(Self {
            user_id: user_id.to_string(),
            recipe_id,
            title: recipe.title.clone(),
            image: recipe.image.clone(),
            cook_time: recipe.cook_time.clone(),
            servings: recipe.servings.clone(),
        })
    }
}

pub fn parse_recipe_id(id: &str) -> CoreResult<i64> {
    validate_meal_id(id)?
        .parse::<i64>()
        .map_err(|e| CoreError::Validation(format!("recipe id {id:?}: {e}")))
}

/// A bookmark as the store keeps it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoredFavorite {
    pub id: Uuid,
    pub user_id: String,
    pub recipe_id: i64,
    pub title: String,
    pub image: String,
    pub cook_time: String,
    pub servings: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl StoredFavorite {
    pub fn new(entry: FavoriteEntry) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: entry.user_id,
            recipe_id: entry.recipe_id,
            title: entry.title,
            image: entry.image,
            cook_time: entry.cook_time,
            servings: entry.servings,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Older clients send `servings` as a number.
fn string_or_number<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Number(serde_json::Number),
        Null(()),
    }
    Ok(match Loose::deserialize(de)? {
        Loose::Text(s) => s,
        Loose::Number(n) => n.to_string(),
        Loose::Null(()) => String::new(),
    })
}
