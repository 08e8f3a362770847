use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Top-level application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub reddit: RedditConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Language-model completion service configuration
#[derive(Debug, Deserialize, Clone)]
pub struct OpenAiConfig {
    /// API key for authentication
    #[serde(default)]
    pub api_key: String,
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL for the API endpoint (for proxies and tests)
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Reddit OAuth and content API configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RedditConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    /// User-agent sent on every Reddit request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Token endpoint host
    #[serde(default = "default_token_base_url")]
    pub token_base_url: String,
    /// Authenticated content API host
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Redirect-resolution timeout in seconds
    #[serde(default = "default_resolve_timeout")]
    pub resolve_timeout: u64,
}

/// Document-store cache configuration
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// Disabled caches behave as a permanent miss
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub admin_token: String,
    #[serde(default = "default_cache_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// HTTP server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Whole-request timeout in seconds
    #[serde(default = "default_server_timeout")]
    pub timeout: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: default_openai_base_url(),
            timeout: default_timeout(),
        }
    }
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            user_agent: default_user_agent(),
            token_base_url: default_token_base_url(),
            api_base_url: default_api_base_url(),
            timeout: default_timeout(),
            resolve_timeout: default_resolve_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            app_id: String::new(),
            admin_token: String::new(),
            base_url: default_cache_base_url(),
            timeout: default_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout: default_server_timeout(),
        }
    }
}

// Default value functions
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_user_agent() -> String {
    "bar-buddy/1.0 (extractor)".to_string()
}

fn default_token_base_url() -> String {
    "https://www.reddit.com".to_string()
}

fn default_api_base_url() -> String {
    "https://oauth.reddit.com".to_string()
}

fn default_cache_base_url() -> String {
    "https://api.instantdb.com".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_resolve_timeout() -> u64 {
    5
}

fn default_server_timeout() -> u64 {
    120
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with BARBUDDY__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: BARBUDDY__REDDIT__CLIENT_ID
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Optional config file (can be missing)
            .add_source(File::with_name("config").required(false))
            // Use double underscore for nested: BARBUDDY__OPENAI__API_KEY
            .add_source(
                Environment::with_prefix("BARBUDDY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai: OpenAiConfig::default(),
            reddit: RedditConfig::default(),
            cache: CacheConfig::default(),
            server: ServerConfig::default(),
        }
    }
}
