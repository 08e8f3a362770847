mod open_ai;
mod prompt;

pub use open_ai::OpenAIExtractor;
pub use prompt::INGREDIENT_EXTRACTION_PROMPT;

use crate::error::ExtractError;
use crate::model::NormalizedIngredient;
use async_trait::async_trait;
use serde_json::Value;

/// Maximum characters of recipe text sent to the model.
pub const MAX_PROMPT_TEXT: usize = 30_000;

/// Fields the model extracted from the recipe text. A malformed model
/// response degrades to `ingredients: []`, never an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmExtraction {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub normalized: Option<Vec<NormalizedIngredient>>,
}

/// A language-model completion service that turns recipe text into
/// structured ingredient data.
#[async_trait]
pub trait ExtractIngredients: Send + Sync {
    async fn extract(&self, recipe_text: &str) -> Result<LlmExtraction, ExtractError>;
}

/// Truncate text to `max` characters on a char boundary.
pub(crate) fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Coerce the model's free-form JSON into `LlmExtraction`: trim string
/// fields, keep arrays only when they are arrays, silently discard
/// anything with the wrong type.
pub(crate) fn sanitize_extraction(parsed: &Value) -> LlmExtraction {
    let title = parsed
        .get("title")
        .and_then(Value::as_str)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    let description = parsed
        .get("description")
        .and_then(Value::as_str)
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let ingredients = parsed
        .get("ingredients")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let normalized = parsed
        .get("normalized")
        .filter(|n| n.is_array())
        .and_then(|n| serde_json::from_value::<Vec<NormalizedIngredient>>(n.clone()).ok());

    LlmExtraction {
        title,
        description,
        ingredients,
        normalized,
    }
}
