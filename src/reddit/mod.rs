pub mod parse;

use crate::config::RedditConfig;
use crate::error::ExtractError;
use crate::urls::to_api_url;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Client for Reddit's application-only OAuth flow and authenticated
/// content API.
pub struct RedditClient {
    client: Client,
    client_id: String,
    client_secret: String,
    user_agent: String,
    token_base_url: String,
    api_base_url: String,
}

impl RedditClient {
    pub fn new(config: &RedditConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to create HTTP client");

        RedditClient {
            client,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            user_agent: config.user_agent.clone(),
            token_base_url: config.token_base_url.clone(),
            api_base_url: config.api_base_url.clone(),
        }
    }

    /// Obtain an app-only bearer token via the client-credentials grant.
    /// A fresh token is fetched per extraction; tokens are not reused.
    pub async fn access_token(&self) -> Result<String, ExtractError> {
        let basic = BASE64.encode(format!("{}:{}", self.client_id, self.client_secret));

        let response = self
            .client
            .post(format!("{}/api/v1/access_token", self.token_base_url))
            .header("Authorization", format!("Basic {}", basic))
            .header("User-Agent", &self.user_agent)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("Accept", "application/json")
            .body("grant_type=client_credentials")
            .send()
            .await
            .map_err(|e| ExtractError::Auth(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ExtractError::Auth(response.status().as_u16().to_string()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ExtractError::Auth(e.to_string()))?;

        body["access_token"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| ExtractError::Auth("token missing from response".to_string()))
    }

    /// Fetch the raw two-listing payload for a resolved post URL.
    pub async fn fetch_post(&self, resolved_url: &str, token: &str) -> Result<Value, ExtractError> {
        let api_url = to_api_url(&self.api_base_url, resolved_url)?;
        debug!("Fetching Reddit payload from {}", api_url);

        let response = self
            .client
            .get(&api_url)
            .header("Authorization", format!("Bearer {}", token))
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Cache-Control", "no-store")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::Fetch {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        Ok(response.json().await?)
    }
}
