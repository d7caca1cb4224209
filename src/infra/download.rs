//! HTTP download functionality
//!
//! Fetches upstream text over HTTP with timeouts and retry with exponential
//! backoff. Connection failures, timeouts, `429` and `5xx` responses are
//! retried; any other unsuccessful status fails at once.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backoff::ExponentialBackoffBuilder;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

use crate::config::{defaults, urls};
use crate::error::DownloadError;

/// Download manager for fetching text with retry
#[derive(Debug, Clone)]
pub struct DownloadManager {
    /// HTTP client
    client: reqwest::Client,
    /// Maximum attempts per URL
    max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds)
    base_delay_ms: u64,
}

fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(defaults::CONNECT_TIMEOUT_SECS))
        .user_agent(urls::user_agent())
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

impl DownloadManager {
    /// Create a new download manager
    pub fn new() -> Self {
        Self::with_config(defaults::MAX_DOWNLOAD_RETRIES, defaults::RETRY_BASE_DELAY_MS)
    }

    /// Create a download manager with custom settings
    pub fn with_config(max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            client: build_client(),
            max_retries: max_retries.max(1),
            base_delay_ms,
        }
    }

    /// Get max retries
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Fetch the body of `url` as text, retrying transient failures
    pub async fn fetch_text(&self, url: &str) -> Result<String, DownloadError> {
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(self.base_delay_ms))
            .with_max_interval(Duration::from_secs(10))
            .with_max_elapsed_time(Some(Duration::from_secs(
                defaults::RETRY_MAX_ELAPSED_SECS,
            )))
            .build();

        let attempts = AtomicU32::new(0);
        let attempts = &attempts;
        let max_retries = self.max_retries;
        let operation = || async move {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            match self.fetch_once(url).await {
                Err(backoff::Error::Transient { err, .. }) if attempt >= max_retries => {
                    Err(backoff::Error::permanent(err))
                }
                other => other,
            }
        };

        backoff::future::retry_notify(policy, operation, |e: DownloadError, delay: Duration| {
            tracing::warn!("{e}; retrying in {}ms", delay.as_millis());
        })
        .await
    }

    /// Fetch and deserialize a JSON document
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, DownloadError> {
        let body = self.fetch_text(url).await?;
        serde_json::from_str(&body).map_err(|e| DownloadError::InvalidBody {
            url: url.to_string(),
            error: e.to_string(),
        })
    }

    /// Single attempt, classified as transient or permanent
    async fn fetch_once(&self, url: &str) -> Result<String, backoff::Error<DownloadError>> {
        tracing::debug!("GET {url}");
        let response = self.client.get(url).send().await.map_err(|e| {
            backoff::Error::transient(DownloadError::NetworkError {
                url: url.to_string(),
                error: e.to_string(),
            })
        })?;

        let status = response.status();
        if !status.is_success() {
            let err = DownloadError::HttpStatus {
                url: url.to_string(),
                status: status.to_string(),
            };
            return Err(
                if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    backoff::Error::transient(err)
                } else {
                    backoff::Error::permanent(err)
                },
            );
        }

        response.text().await.map_err(|e| {
            backoff::Error::transient(DownloadError::NetworkError {
                url: url.to_string(),
                error: e.to_string(),
            })
        })
    }
}

impl Default for DownloadManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute SHA256 checksum of data
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
