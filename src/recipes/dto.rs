use serde::{Deserialize, Serialize};

use super::raw::RawCategory;

/// Canonical, display-ready recipe. List fields are never absent and
/// `instructions` always holds at least one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub cook_time: String,
    pub servings: String,
    pub category: String,
    pub area: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub youtube_url: Option<String>,
}

impl Recipe {
    /// Embeddable player URL for a `watch?v=` link.
    pub fn youtube_embed_url(&self) -> Option<String> {
        let url = self.youtube_url.as_deref()?;
        let (_, rest) = url.split_once("v=")?;
        let video_id = rest.split('&').next().unwrap_or_default();
        if video_id.is_empty() {
            return None;
        }
        Some(format!("https://www.youtube.com/embed/{video_id}"))
    }
}

/// Category as shown in the category filter; ids are 1-based positions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCard {
    pub id: usize,
    pub name: String,
    pub image: String,
    pub description: String,
}

impl CategoryCard {
    pub fn from_raw(index: usize, raw: RawCategory) -> Self {
        Self {
            id: index + 1,
            name: raw.name.unwrap_or_default(),
            image: raw.thumb.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
        }
    }
}
