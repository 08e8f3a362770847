use thiserror::Error;

/// Errors that abort an extraction and map to an HTTP error response.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Request body did not contain a usable URL
    #[error("Body must include {{ url: string }}")]
    InvalidInput,

    /// Could not obtain a Reddit OAuth bearer token
    #[error("Reddit OAuth failed: {0}")]
    Auth(String),

    /// Reddit content API returned a non-success status
    #[error("Reddit fetch failed: {status} {status_text}")]
    Fetch { status: u16, status_text: String },

    /// Reddit payload did not match the expected listing shape
    #[error("Could not parse Reddit post payload.")]
    Parse,

    /// Language-model completion service returned a non-success status
    #[error("Model request failed: {0}")]
    Model(u16),

    /// Transport-level failure talking to an upstream service
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Resolved URL could not be parsed when building the API request
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Soft failures against the cache store. These are logged and absorbed by
/// the orchestrator; they never cross into the `ExtractError` channel.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("cache store rejected request: {status}")]
    Status { status: u16 },

    #[error("cache response malformed: {0}")]
    Malformed(String),
}
