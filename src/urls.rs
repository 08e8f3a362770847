use log::{debug, warn};
use std::time::Duration;
use url::Url;

/// Follows redirects on short / mobile share links to reach the canonical
/// post URL. Resolution failure is never fatal: the input comes back
/// unchanged and the pipeline carries on.
pub struct UrlResolver {
    client: reqwest::Client,
}

impl UrlResolver {
    pub fn new(user_agent: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Issue a redirect-following HEAD request and return the final URL.
    pub async fn resolve(&self, url: &str) -> String {
        match self.client.head(url).send().await {
            Ok(res) => {
                let final_url = res.url().to_string();
                debug!("Resolved {} -> {}", url, final_url);
                final_url
            }
            Err(e) => {
                warn!("Failed to resolve {}: {}", url, e);
                url.to_string()
            }
        }
    }
}

/// Canonicalize a URL into the cache-key form: scheme+host+path only,
/// lower-cased, with any `reddit.com` host collapsed to `www.reddit.com`.
///
/// Pure and deterministic; unparsable input degrades to the lower-cased
/// raw string.
pub fn normalize_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            if let Some(host) = url.host_str() {
                if host.contains("reddit.com") {
                    // Host is a valid hostname, set_host cannot fail here
                    let _ = url.set_host(Some("www.reddit.com"));
                }
            }
            url.to_string().to_lowercase()
        }
        Err(_) => raw.to_lowercase(),
    }
}

/// Rewrite a resolved post URL into the authenticated content API form:
/// the configured API host, a path ending in `.json`, and `raw_json=1`
/// so text fields arrive unescaped.
pub fn to_api_url(api_base: &str, resolved: &str) -> Result<String, url::ParseError> {
    let parsed = Url::parse(resolved)?;

    let mut path = parsed.path().trim_end_matches('/').to_string();
    if !path.ends_with(".json") {
        path.push_str("/.json");
    }

    let mut api = Url::parse(api_base)?;
    api.set_path(&path);

    let carried: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(k, _)| k != "raw_json")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    {
        let mut pairs = api.query_pairs_mut();
        pairs.clear();
        for (k, v) in &carried {
            pairs.append_pair(k, v);
        }
        pairs.append_pair("raw_json", "1");
    }

    Ok(api.to_string())
}
