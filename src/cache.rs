use crate::config::CacheConfig;
use crate::error::CacheError;
use crate::model::CacheEntry;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use uuid::Uuid;

/// Extraction-result cache keyed by normalized URL.
///
/// Both operations are best-effort: the orchestrator treats a lookup error
/// as a miss and a store error as a no-op.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn lookup(&self, normalized_url: &str) -> Result<Option<CacheEntry>, CacheError>;

    /// Insert a new entry under a fresh id. Concurrent misses may insert
    /// duplicates for the same key; tolerated.
    async fn store(&self, entry: &CacheEntry) -> Result<(), CacheError>;
}

/// Adapter for the hosted document store's admin HTTP API.
pub struct InstantCache {
    client: Client,
    base_url: String,
    app_id: String,
    admin_token: String,
}

impl InstantCache {
    pub fn new(config: &CacheConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to create HTTP client");

        InstantCache {
            client,
            base_url: config.base_url.clone(),
            app_id: config.app_id.clone(),
            admin_token: config.admin_token.clone(),
        }
    }
}

#[async_trait]
impl CacheStore for InstantCache {
    async fn lookup(&self, normalized_url: &str) -> Result<Option<CacheEntry>, CacheError> {
        let response = self
            .client
            .post(format!("{}/admin/query", self.base_url))
            .header("Authorization", format!("Bearer {}", self.admin_token))
            .header("App-Id", &self.app_id)
            .json(&json!({
                "query": { "redditCache": { "$": { "where": { "url": normalized_url } } } }
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CacheError::Status {
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await?;
        let Some(doc) = body
            .get("redditCache")
            .and_then(Value::as_array)
            .and_then(|docs| docs.first())
        else {
            return Ok(None);
        };

        let entry: CacheEntry = serde_json::from_value(doc.clone())
            .map_err(|e| CacheError::Malformed(e.to_string()))?;
        debug!("Cache hit for {}", normalized_url);
        Ok(Some(entry))
    }

    async fn store(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        let id = Uuid::new_v4().to_string();
        let response = self
            .client
            .post(format!("{}/admin/transact", self.base_url))
            .header("Authorization", format!("Bearer {}", self.admin_token))
            .header("App-Id", &self.app_id)
            .json(&json!({
                "steps": [["update", "redditCache", id, entry]]
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CacheError::Status {
                status: status.as_u16(),
            });
        }

        debug!("Cached result for {}", entry.url);
        Ok(())
    }
}

/// Cache used when no document store is configured; every lookup misses.
pub struct NoopCache;

#[async_trait]
impl CacheStore for NoopCache {
    async fn lookup(&self, _normalized_url: &str) -> Result<Option<CacheEntry>, CacheError> {
        Ok(None)
    }

    async fn store(&self, _entry: &CacheEntry) -> Result<(), CacheError> {
        Ok(())
    }
}
