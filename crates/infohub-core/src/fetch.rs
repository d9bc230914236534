//! # Remote Content Fetcher
//!
//! Retrieves page fragments (HTML, JavaScript, CSS, Markdown) from the
//! raw-content origin.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::config::HubConfig;
use crate::error::FetchError;

/// A source of named text resources.
///
/// Paths are relative (`gui/baro.html`) and must already be safe; no
/// traversal normalisation is performed.
#[async_trait]
pub trait ResourceSource: Send + Sync {
    /// Fetches the resource at `path` as text.
    async fn fetch(&self, path: &str) -> Result<String, FetchError>;
}

/// HTTP fetcher bound to a base URL.
///
/// Every call goes to the origin; nothing is cached and nothing is retried.
/// The client is cheaply cloneable.
///
/// # Examples
///
/// ```rust,ignore
/// use infohub_core::fetch::{RemoteFetcher, ResourceSource};
///
/// let fetcher = RemoteFetcher::from_config(&HubConfig::default())?;
/// let readme = fetcher.fetch("README.md").await?;
/// ```
#[derive(Clone, Debug)]
pub struct RemoteFetcher {
    base_url: String,
    http: Client,
}

impl RemoteFetcher {
    /// Creates a fetcher for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the TLS backend cannot be initialised.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        verify_tls: bool,
    ) -> Result<Self, FetchError> {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        if !verify_tls {
            tracing::warn!(%base_url, "TLS certificate verification is disabled");
        }

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("WarframeInfoHub/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(!verify_tls)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { base_url, http })
    }

    /// Creates a fetcher from the hub configuration.
    ///
    /// # Errors
    ///
    /// See [`RemoteFetcher::new`].
    pub fn from_config(config: &HubConfig) -> Result<Self, FetchError> {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
            config.verify_tls,
        )
    }

    /// Returns the base URL, always ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the absolute URL for a relative resource path.
    fn resolve(&self, path: &str) -> Result<Url, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        Url::parse(&url).map_err(|e| FetchError::InvalidUrl {
            url,
            message: e.to_string(),
        })
    }

    fn classify(path: &str, source: reqwest::Error) -> FetchError {
        if source.is_timeout() {
            FetchError::Timeout {
                path: path.to_string(),
            }
        } else {
            FetchError::Network {
                path: path.to_string(),
                source,
            }
        }
    }
}

#[async_trait]
impl ResourceSource for RemoteFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let result = async {
            let url = self.resolve(path)?;
            let res = self
                .http
                .get(url)
                .send()
                .await
                .map_err(|e| Self::classify(path, e))?;

            if !res.status().is_success() {
                return Err(FetchError::Status {
                    path: path.to_string(),
                    status: res.status().as_u16(),
                });
            }

            res.text().await.map_err(|e| Self::classify(path, e))
        }
        .await;

        match &result {
            Ok(body) => tracing::debug!(path, bytes = body.len(), "Downloaded resource"),
            Err(e) => tracing::error!(path, error = %e, "Failed to download resource"),
        }
        result
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// In-memory source that records every requested path.
    #[derive(Default)]
    pub struct MemorySource {
        files: HashMap<String, String>,
        requests: Mutex<Vec<String>>,
    }

    impl MemorySource {
        pub fn with(mut self, path: &str, body: &str) -> Self {
            self.files.insert(path.to_string(), body.to_string());
            self
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        pub fn count(&self, path: &str) -> usize {
            self.requests().iter().filter(|p| *p == path).count()
        }
    }

    #[async_trait]
    impl ResourceSource for MemorySource {
        async fn fetch(&self, path: &str) -> Result<String, FetchError> {
            self.requests.lock().unwrap().push(path.to_string());
            self.files.get(path).cloned().ok_or_else(|| FetchError::Status {
                path: path.to_string(),
                status: 404,
            })
        }
    }
}
