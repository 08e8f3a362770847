use crate::cache::{CacheStore, InstantCache, NoopCache};
use crate::config::AppConfig;
use crate::error::ExtractError;
use crate::extractor::{ExtractIngredients, OpenAIExtractor};
use crate::model::{CacheEntry, ExtractionResult, SourceRef};
use crate::reddit::parse::{parse_post, pick_first_image, select_recipe_text};
use crate::reddit::RedditClient;
use crate::urls::{normalize_url, UrlResolver};
use log::{debug, info, warn};
use std::time::Duration;

/// End-to-end extraction: resolve → cache check → OAuth → fetch → parse →
/// select text → model extraction → cache write.
///
/// Cache failures on either side are absorbed; the pipeline only aborts on
/// input, auth, fetch, and parse failures.
pub struct ExtractionPipeline {
    resolver: UrlResolver,
    reddit: RedditClient,
    extractor: Box<dyn ExtractIngredients>,
    cache: Box<dyn CacheStore>,
}

impl ExtractionPipeline {
    pub fn new(config: &AppConfig) -> Self {
        let cache: Box<dyn CacheStore> = if config.cache.enabled && !config.cache.app_id.is_empty()
        {
            Box::new(InstantCache::new(&config.cache))
        } else {
            Box::new(NoopCache)
        };

        ExtractionPipeline {
            resolver: UrlResolver::new(
                &config.reddit.user_agent,
                Duration::from_secs(config.reddit.resolve_timeout),
            ),
            reddit: RedditClient::new(&config.reddit),
            extractor: Box::new(OpenAIExtractor::new(&config.openai)),
            cache,
        }
    }

    /// Assemble a pipeline from explicit parts.
    pub fn with_parts(
        resolver: UrlResolver,
        reddit: RedditClient,
        extractor: Box<dyn ExtractIngredients>,
        cache: Box<dyn CacheStore>,
    ) -> Self {
        ExtractionPipeline {
            resolver,
            reddit,
            extractor,
            cache,
        }
    }

    pub async fn extract(&self, url: &str) -> Result<ExtractionResult, ExtractError> {
        let resolved = self.resolver.resolve(url).await;
        let key = normalize_url(&resolved);
        info!(
            "Extracting: input={} resolved={} normalized={}",
            url, resolved, key
        );

        match self.cache.lookup(&key).await {
            Ok(Some(entry)) => {
                info!("Cache hit for {}", key);
                return Ok(entry.into_result(&resolved));
            }
            Ok(None) => debug!("Cache miss for {}", key),
            Err(e) => warn!("Cache check failed, proceeding uncached: {}", e),
        }

        let token = self.reddit.access_token().await?;
        let payload = self.reddit.fetch_post(&resolved, &token).await?;
        let post = parse_post(&payload).ok_or(ExtractError::Parse)?;

        let image_url = pick_first_image(&post.images, &post.url_overridden_by_dest);
        let (recipe_text, from) = select_recipe_text(&payload, &post);

        // Nothing to extract from: minimal terminal response, no model
        // call and no cache write.
        if recipe_text.is_empty() {
            return Ok(ExtractionResult {
                title: Some(post.title.clone()).filter(|t| !t.is_empty()),
                description: None,
                ingredients: Vec::new(),
                normalized: None,
                image_url,
                from: Some(from),
                source: SourceRef { url: resolved },
            });
        }

        debug!("Recipe text length: {}", recipe_text.len());
        let extracted = self.extractor.extract(&recipe_text).await?;

        let result = ExtractionResult {
            title: extracted.title,
            description: extracted.description,
            ingredients: extracted.ingredients,
            normalized: extracted.normalized,
            image_url,
            from: Some(from),
            source: SourceRef { url: resolved },
        };

        let entry = CacheEntry::from_result(&key, &result);
        if let Err(e) = self.cache.store(&entry).await {
            warn!("Failed to cache result for {}: {}", key, e);
        }

        Ok(result)
    }
}
