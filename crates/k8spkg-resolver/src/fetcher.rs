//! Fetching of plaintext version manifests

use async_trait::async_trait;
use k8spkg_core::{Error, Result};
use tracing::debug;

/// Source of raw version manifest bodies
#[async_trait]
pub trait ManifestFetcher: Send + Sync {
    /// Fetch the body at `url` as UTF-8 text
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetches manifests over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with its own HTTP client
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("k8spkgctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::network("<client>", e))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ManifestFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::network(url, e))?;

        let response = response
            .error_for_status()
            .map_err(|e| Error::network(url, e))?;

        response.text().await.map_err(|e| Error::network(url, e))
    }
}
