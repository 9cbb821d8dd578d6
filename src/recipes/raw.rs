use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of indexed ingredient/measure slots in a catalog record.
pub const INGREDIENT_SLOTS: usize = 20;

/// One meal as the catalog sends it. Nothing in it is guaranteed to be present,
/// so it is kept as a loose JSON object and read field by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawMealRecord(Map<String, Value>);

impl RawMealRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used by fixtures and fakes.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn with_ingredient(self, slot: usize, name: &str, measure: &str) -> Self {
        self.with(&format!("strIngredient{slot}"), name)
            .with(&format!("strMeasure{slot}"), measure)
    }

    /// Text of a field; numbers are rendered, anything else (absent, null,
    /// arrays, objects) reads as empty.
    pub fn text(&self, key: &str) -> String {
        match self.0.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    pub fn id(&self) -> String {
        self.text("idMeal")
    }

    pub fn name(&self) -> String {
        self.text("strMeal")
    }

    pub fn ingredient(&self, slot: usize) -> String {
        self.text(&format!("strIngredient{slot}"))
    }

    pub fn measure(&self, slot: usize) -> String {
        self.text(&format!("strMeasure{slot}"))
    }

    /// `None` when the field is absent or `null`; the raw string otherwise.
    pub fn instructions(&self) -> Option<&str> {
        self.0.get("strInstructions").and_then(Value::as_str)
    }
}

/// Catalog category descriptor from `categories.php`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCategory {
    #[serde(rename = "idCategory", default)]
    pub id: Option<String>,
    #[serde(rename = "strCategory", default)]
    pub name: Option<String>,
    #[serde(rename = "strCategoryThumb", default)]
    pub thumb: Option<String>,
    #[serde(rename = "strCategoryDescription", default)]
    pub description: Option<String>,
}

/// `{"meals": [...]}`; the catalog sends `null` for no match.
#[derive(Debug, Deserialize)]
pub(crate) struct MealsEnvelope {
    #[serde(default)]
    pub meals: Option<Vec<RawMealRecord>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoriesEnvelope {
    #[serde(default)]
    pub categories: Option<Vec<RawCategory>>,
}
