use super::{sanitize_extraction, truncate_chars, ExtractIngredients, LlmExtraction};
use super::{INGREDIENT_EXTRACTION_PROMPT, MAX_PROMPT_TEXT};
use crate::config::OpenAiConfig;
use crate::error::ExtractError;
use log::{debug, warn};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub struct OpenAIExtractor {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAIExtractor {
    pub fn new(config: &OpenAiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to create HTTP client");

        OpenAIExtractor {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait::async_trait]
impl ExtractIngredients for OpenAIExtractor {
    async fn extract(&self, recipe_text: &str) -> Result<LlmExtraction, ExtractError> {
        let prompt = format!(
            "{}\n\n{}",
            INGREDIENT_EXTRACTION_PROMPT,
            truncate_chars(recipe_text, MAX_PROMPT_TEXT)
        );

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": self.model,
                "messages": [
                    {"role": "user", "content": prompt}
                ],
                "temperature": 0.0
            }))
            .send()
            .await?;

        // A failing service is a hard error; only unparsable model text
        // takes the soft path below.
        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::Model(status.as_u16()));
        }

        let body: Value = response.json().await?;
        debug!("Model response: {:?}", body);

        let text = body["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("{}");

        match serde_json::from_str::<Value>(text) {
            Ok(parsed) => Ok(sanitize_extraction(&parsed)),
            Err(e) => {
                // Malformed model output degrades to an empty result
                warn!("Model returned unparsable JSON: {}", e);
                Ok(LlmExtraction {
                    ingredients: Vec::new(),
                    ..Default::default()
                })
            }
        }
    }
}
