use lazy_static::lazy_static;
use regex::Regex;

use super::dto::Recipe;
use super::raw::{RawMealRecord, INGREDIENT_SLOTS};

pub const PLACEHOLDER_COOK_TIME: &str = "30 minutes";
pub const PLACEHOLDER_SERVINGS: &str = "4";
pub const FALLBACK_DESCRIPTION: &str = "Delicious meal from TheMealDB";
const DESCRIPTION_CHARS: usize = 120;

lazy_static! {
    static ref LINE_BREAK: Regex = Regex::new(r"\r\n|\r|\n").unwrap();
    // "STEP 3", "Step 3:", "3.", "3)", "-", "*", "•" at the start of a line.
    static ref STEP_MARKER: Regex =
        Regex::new(r"(?i)^(?:step\s*\d+\s*[:.)\-]?|\d+\s*[.):]|[-*•])(?:\s+|$)").unwrap();
}

/// Turn a raw catalog record into a canonical [`Recipe`].
///
/// Returns `None` only when there is no record at all; every other shape,
/// however sparse, yields a recipe with empty-string fallbacks.
pub fn normalize(raw: Option<&RawMealRecord>) -> Option<Recipe> {
    let raw = raw?;
    let instructions_text = raw.instructions();
    let youtube = raw.text("strYoutube");

    Some(Recipe {
        id: raw.id(),
        title: raw.name(),
        description: describe(instructions_text),
        image: raw.text("strMealThumb"),
        cook_time: PLACEHOLDER_COOK_TIME.to_string(),
        servings: PLACEHOLDER_SERVINGS.to_string(),
        category: raw.text("strCategory"),
        area: raw.text("strArea"),
        ingredients: assemble_ingredients(raw),
        instructions: split_instructions(instructions_text.unwrap_or_default()),
        youtube_url: (!youtube.trim().is_empty()).then(|| youtube.trim().to_string()),
    })
}

/// Normalize a batch, dropping unrepresentable records.
pub fn normalize_all<'a, I>(records: I) -> Vec<Recipe>
where
    I: IntoIterator<Item = Option<&'a RawMealRecord>>,
{
    records.into_iter().filter_map(normalize).collect()
}

/// Scan slots 1..=20 in order. A slot with an empty name is skipped but the
/// scan continues past it.
pub fn assemble_ingredients(raw: &RawMealRecord) -> Vec<String> {
    (1..=INGREDIENT_SLOTS)
        .filter_map(|slot| {
            let name = raw.ingredient(slot);
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            let measure = raw.measure(slot);
            let measure = measure.trim();
            Some(if measure.is_empty() {
                name.to_string()
            } else {
                format!("{measure} {name}")
            })
        })
        .collect()
}

/// Split free text into steps: break on any line ending, trim, strip one
/// leading step marker, drop what is left empty. When nothing survives the
/// untrimmed input is the single step.
pub fn split_instructions(text: &str) -> Vec<String> {
    let steps: Vec<String> = LINE_BREAK
        .split(text)
        .map(|piece| STEP_MARKER.replace(piece.trim(), "").trim().to_string())
        .filter(|step| !step.is_empty())
        .collect();

    if steps.is_empty() {
        vec![text.to_string()]
    } else {
        steps
    }
}

fn describe(instructions: Option<&str>) -> String {
    match instructions {
        Some(text) if !text.is_empty() => {
            let head: String = text.chars().take(DESCRIPTION_CHARS).collect();
            format!("{head}...")
        }
        _ => FALLBACK_DESCRIPTION.to_string(),
    }
}
