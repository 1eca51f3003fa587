use serde::Deserialize;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::models::WallpaperCandidate;

/// Fixed status endpoint path under the configured server URL.
const STATUS_PATH: &str = "tvdb/api.json";

/// Fetch failures (for fallback decisions and logging).
/// The resolver treats every variant the same way: degrade to cache.
#[derive(Debug)]
pub enum FetchError {
    /// No usable server URL configured.
    Config(String),
    /// Connection, DNS or timeout failure.
    Network(String),
    /// Non-success HTTP status.
    Http { status: u16, message: String },
    /// Well-formed transport, malformed body.
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Config(s) => write!(f, "Config: {}", s),
            FetchError::Network(s) => write!(f, "Network: {}", s),
            FetchError::Http { status, message } => write!(f, "HTTP {}: {}", status, message),
            FetchError::Decode(s) => write!(f, "Decode: {}", s),
        }
    }
}

/// One network call returning zero, one or many wallpaper candidates.
/// The transport owns its own timeout; failures must surface as `FetchError`,
/// never as a panic, so the resolver can fall back to cache.
pub trait RemoteSource {
    fn fetch_wallpaper_status(
        &self,
        base_url: &str,
    ) -> impl Future<Output = Result<Vec<WallpaperCandidate>, FetchError>> + Send;
}

/// The endpoint may return a single object or an array of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum StatusBody {
    Many(Vec<WallpaperCandidate>),
    One(WallpaperCandidate),
}

/// Transport configuration (timeout, user agent).
#[derive(Clone)]
pub struct SourceConfig {
    pub http_timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: 10,
        }
    }
}

/// Production `RemoteSource` over reqwest.
#[derive(Clone)]
pub struct HttpRemoteSource {
    client: reqwest::Client,
}

impl HttpRemoteSource {
    pub fn new() -> Self {
        Self::with_config(SourceConfig::default())
    }

    pub fn with_config(config: SourceConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }

    /// The host stores whatever the user typed; the endpoint path requires
    /// the base to end with a slash.
    fn status_url(base_url: &str) -> String {
        let trimmed = base_url.trim();
        if trimmed.ends_with('/') {
            format!("{}{}", trimmed, STATUS_PATH)
        } else {
            format!("{}/{}", trimmed, STATUS_PATH)
        }
    }
}

impl Default for HttpRemoteSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteSource for HttpRemoteSource {
    async fn fetch_wallpaper_status(
        &self,
        base_url: &str,
    ) -> Result<Vec<WallpaperCandidate>, FetchError> {
        if base_url.trim().is_empty() {
            return Err(FetchError::Config("server URL is not configured".into()));
        }

        let url = Self::status_url(base_url);
        debug!("[FETCH] GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or("Unknown").into()
            } else {
                body
            };
            warn!("[FETCH] Status endpoint returned HTTP {}", status.as_u16());
            return Err(FetchError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let candidates = match serde_json::from_str::<StatusBody>(&body) {
            Ok(StatusBody::Many(list)) => list,
            Ok(StatusBody::One(single)) => vec![single],
            Err(e) => return Err(FetchError::Decode(e.to_string())),
        };

        debug!("[FETCH] Decoded {} candidate(s)", candidates.len());
        Ok(candidates)
    }
}
