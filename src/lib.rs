//! Bar Buddy's Reddit recipe extraction service.
//!
//! Given a Reddit post URL (including short and mobile share links), this
//! crate resolves the link, pulls the post through Reddit's authenticated
//! API, decides whether the recipe lives in the post body or the original
//! poster's top-level comment, extracts structured ingredient data with a
//! language model, and caches the result in a hosted document store keyed
//! by normalized URL.
//!
//! The library exposes the pipeline directly; the `barbuddy-extract` binary
//! serves it as `POST /api/extract`.

pub mod cache;
pub mod config;
pub mod error;
pub mod extractor;
pub mod heuristics;
pub mod model;
pub mod pipeline;
pub mod reddit;
pub mod server;
pub mod urls;

pub use config::AppConfig;
pub use error::{CacheError, ExtractError};
pub use model::{ExtractionResult, NormalizedIngredient, RecipeSource};
pub use pipeline::ExtractionPipeline;

/// Run a single extraction using configuration from the environment.
pub async fn extract_from_url(url: &str) -> Result<ExtractionResult, ExtractError> {
    let config = AppConfig::load()?;
    let pipeline = ExtractionPipeline::new(&config);
    pipeline.extract(url).await
}
