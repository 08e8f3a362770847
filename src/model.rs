use serde::{Deserialize, Serialize};

/// Which text the extractor consumed: the post body or the original
/// poster's top-level comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeSource {
    Post,
    OpComment,
}

impl Default for RecipeSource {
    fn default() -> Self {
        RecipeSource::Post
    }
}

/// The resolved (non-normalized) URL the result came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub url: String,
}

/// A single structured ingredient from the model's `normalized` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedIngredient {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The artifact returned to the caller and persisted to the cache.
///
/// `ingredients` is always present (possibly empty); every other field is
/// optional and serializes as absent rather than null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized: Option<Vec<NormalizedIngredient>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<RecipeSource>,
    pub source: SourceRef,
}

/// Post fields parsed out of the raw listing payload. Ephemeral, never
/// persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RedditPost {
    pub title: String,
    pub selftext: String,
    pub author: String,
    pub url_overridden_by_dest: String,
    pub images: Vec<String>,
}

/// Persisted form of an extraction result, keyed by normalized URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// Normalized URL, the unique cache key
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized: Option<Vec<NormalizedIngredient>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Resolved URL at the time the entry was written
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_from: Option<RecipeSource>,
    /// Epoch milliseconds
    pub created_at: i64,
}

impl CacheEntry {
    /// Build the persisted form of a result under a normalized key.
    pub fn from_result(key: &str, result: &ExtractionResult) -> Self {
        CacheEntry {
            url: key.to_string(),
            title: result.title.clone(),
            description: result.description.clone(),
            ingredients: result.ingredients.clone(),
            normalized: result.normalized.clone(),
            image_url: result.image_url.clone(),
            source: result.source.url.clone(),
            extracted_from: result.from,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Reshape a cached entry into a response, substituting the freshly
    /// resolved URL for `source.url`.
    pub fn into_result(self, resolved_url: &str) -> ExtractionResult {
        ExtractionResult {
            title: self.title.filter(|t| !t.is_empty()),
            description: self.description.filter(|d| !d.is_empty()),
            ingredients: self.ingredients,
            normalized: self.normalized,
            image_url: self.image_url.filter(|u| !u.is_empty()),
            from: Some(self.extracted_from.unwrap_or_default()),
            source: SourceRef {
                url: resolved_url.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_absent_not_null() {
        let result = ExtractionResult {
            title: None,
            description: None,
            ingredients: vec![],
            normalized: None,
            image_url: None,
            from: Some(RecipeSource::Post),
            source: SourceRef {
                url: "https://www.reddit.com/r/cocktails/comments/abc".to_string(),
            },
        };

        let json = serde_json::to_value(&result).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("title"));
        assert!(!obj.contains_key("description"));
        assert!(!obj.contains_key("normalized"));
        assert!(!obj.contains_key("image_url"));
        assert_eq!(json["ingredients"], serde_json::json!([]));
        assert_eq!(json["from"], "post");
    }

    #[test]
    fn test_cache_entry_round_trip_preserves_ingredients() {
        let result = ExtractionResult {
            title: Some("Paper Plane".to_string()),
            description: Some("bright and bitter".to_string()),
            ingredients: vec![
                "3/4 oz Bourbon".to_string(),
                "3/4 oz Aperol".to_string(),
                "3/4 oz Amaro Nonino".to_string(),
                "3/4 oz Lemon juice".to_string(),
            ],
            normalized: Some(vec![NormalizedIngredient {
                name: "Bourbon".to_string(),
                quantity: Some("3/4".to_string()),
                unit: Some("oz".to_string()),
                notes: None,
            }]),
            image_url: Some("https://i.redd.it/abc.jpg".to_string()),
            from: Some(RecipeSource::Post),
            source: SourceRef {
                url: "https://www.reddit.com/r/cocktails/comments/abc/paper_plane/".to_string(),
            },
        };

        let entry = CacheEntry::from_result("https://www.reddit.com/r/cocktails/comments/abc", &result);
        let restored = entry.into_result(&result.source.url);
        assert_eq!(restored, result);
    }

    #[test]
    fn test_cache_entry_defaults_from_to_post() {
        let entry = CacheEntry {
            url: "k".to_string(),
            title: None,
            description: None,
            ingredients: vec!["Gin".to_string()],
            normalized: None,
            image_url: None,
            source: "https://example.com".to_string(),
            extracted_from: None,
            created_at: 0,
        };

        let result = entry.into_result("https://example.com/resolved");
        assert_eq!(result.from, Some(RecipeSource::Post));
        assert_eq!(result.source.url, "https://example.com/resolved");
    }
}
