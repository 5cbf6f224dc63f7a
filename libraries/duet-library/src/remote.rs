//! Remote catalog over a realtime-database REST endpoint
//!
//! Items live under fixed paths (`music`, `video`) and are read with a single
//! `GET {base}/{path}.json`. The body is `null` when the path is empty, an
//! object keyed by record id, or an array when the keys happen to be dense
//! integers (holes come back as `null`).

use crate::error::{LibraryError, Result};
use async_trait::async_trait;
use duet_core::{MediaItem, MediaKind, RemoteCatalog};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Where and how to reach the remote data source
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Database root, e.g. `https://example.firebaseio.com`
    pub base_url: String,

    /// Whole-request timeout
    pub timeout: Duration,
}

impl RemoteConfig {
    /// Create a config with a 10 second timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Override the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// One stored record as the database returns it
#[derive(Debug, Clone, Default, Deserialize)]
struct RemoteRecord {
    title: Option<String>,
    uri: Option<String>,
    id: Option<Value>,
    /// Seconds
    duration: Option<f64>,
}

/// HTTP client for the remote media catalog
#[derive(Debug, Clone)]
pub struct RealtimeDbCatalog {
    http: Client,
    base_url: String,
}

impl RealtimeDbCatalog {
    /// Create a catalog client
    ///
    /// Rejects empty, non-http and unparseable base URLs.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(LibraryError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(LibraryError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        Url::parse(&base_url).map_err(|e| LibraryError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("DuetPlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Normalized base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch every item stored under the path for `kind`
    pub async fn fetch_items(&self, kind: MediaKind) -> Result<Vec<MediaItem>> {
        let url = format!("{}/{}.json", self.base_url, kind.remote_path());
        debug!(url = %url, "Fetching remote catalog");

        let response = self.http.get(&url).send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                LibraryError::Unreachable(e.to_string())
            } else {
                LibraryError::Request(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LibraryError::ServerError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| LibraryError::ParseError(format!("Failed to parse catalog: {e}")))?;

        let items = parse_records(kind, body)?;
        info!(%kind, count = items.len(), "Fetched remote catalog");
        Ok(items)
    }
}

#[async_trait]
impl RemoteCatalog for RealtimeDbCatalog {
    async fn fetch(&self, kind: MediaKind) -> duet_core::Result<Vec<MediaItem>> {
        Ok(self.fetch_items(kind).await?)
    }
}

/// Turn a catalog body into media items, keeping source order
///
/// Music records without a title or uri are skipped. Video records take
/// empty strings and a zero duration for whatever is missing.
pub fn parse_records(kind: MediaKind, body: Value) -> Result<Vec<MediaItem>> {
    let entries: Vec<(String, Value)> = match body {
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map.into_iter().collect(),
        Value::Array(values) => values
            .into_iter()
            .enumerate()
            .map(|(index, value)| (index.to_string(), value))
            .collect(),
        other => {
            return Err(LibraryError::ParseError(format!(
                "expected object or array, got {other}"
            )))
        }
    };

    let mut items = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        if value.is_null() {
            continue;
        }
        let record: RemoteRecord = match serde_json::from_value(value) {
            Ok(record) => record,
            Err(e) => {
                warn!(key = %key, error = %e, "Skipping malformed record");
                continue;
            }
        };
        if let Some(item) = record.into_item(&key, kind) {
            items.push(item);
        }
    }
    Ok(items)
}

impl RemoteRecord {
    fn into_item(self, key: &str, kind: MediaKind) -> Option<MediaItem> {
        let id = match self.id {
            Some(Value::String(id)) => id,
            Some(Value::Number(id)) => id.to_string(),
            _ => key.to_string(),
        };

        match kind {
            MediaKind::Audio => {
                let (Some(title), Some(uri)) = (self.title, self.uri) else {
                    debug!(key = %key, "Skipping music record without title or uri");
                    return None;
                };
                let item = MediaItem::new(id, title, uri, kind);
                Some(match self.duration.and_then(seconds) {
                    Some(duration) => item.with_duration(duration),
                    None => item,
                })
            }
            MediaKind::Video => {
                let duration = self.duration.and_then(seconds).unwrap_or(Duration::ZERO);
                Some(
                    MediaItem::new(
                        id,
                        self.title.unwrap_or_default(),
                        self.uri.unwrap_or_default(),
                        kind,
                    )
                    .with_duration(duration),
                )
            }
        }
    }
}

/// Seconds to a millisecond-precision duration; negatives and NaN are dropped
fn seconds(secs: f64) -> Option<Duration> {
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    let millis = (secs * 1000.0).round() as u64;
    Some(Duration::from_millis(millis))
}
