//! Channel version resolution with per-run memoization

use std::collections::HashMap;

use k8spkg_core::{DownloadBase, ResolverId, Result, VersionSource, VersionSpec};
use tracing::{debug, info};

use crate::fetcher::ManifestFetcher;
use crate::version::{ci_version, clean_version, cri_tools_version};

/// Well-known manifest and download locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Latest stable release manifest
    pub stable: String,
    /// Latest release manifest, pre-releases included
    pub latest: String,
    /// Latest cross-built CI build manifest
    pub ci_latest: String,
    /// Root of CI build downloads
    pub ci_download_base: String,
    /// Root of release downloads
    pub release_download_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            stable: "https://dl.k8s.io/release/stable.txt".to_string(),
            latest: "https://dl.k8s.io/release/latest.txt".to_string(),
            ci_latest: "https://dl.k8s.io/ci-cross/latest.txt".to_string(),
            ci_download_base: "https://dl.k8s.io/ci-cross".to_string(),
            release_download_base: "https://dl.k8s.io".to_string(),
        }
    }
}

impl Endpoints {
    /// Default endpoints with a different release download base
    pub fn with_release_download_base(base: impl Into<String>) -> Self {
        Self { release_download_base: base.into(), ..Default::default() }
    }
}

/// Plain values a version spec resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    pub version: String,
    pub download_link_base: String,
}

/// Resolves version specs, fetching each manifest at most once
pub struct VersionResolver<F> {
    fetcher: F,
    endpoints: Endpoints,
    cache: HashMap<String, String>,
}

impl<F: ManifestFetcher> VersionResolver<F> {
    pub fn new(fetcher: F, endpoints: Endpoints) -> Self {
        Self { fetcher, endpoints, cache: HashMap::new() }
    }

    /// Fetch and clean the manifest at `url`, reusing earlier answers
    async fn manifest(&mut self, url: &str) -> Result<String> {
        if let Some(version) = self.cache.get(url) {
            return Ok(version.clone());
        }

        let raw = self.fetcher.fetch(url).await?;
        let version = clean_version(&raw);
        info!("Resolved {} -> {}", url, version);

        self.cache.insert(url.to_string(), version.clone());
        Ok(version)
    }

    /// Latest stable Kubernetes version
    pub async fn stable_kube_version(&mut self) -> Result<String> {
        let url = self.endpoints.stable.clone();
        self.manifest(&url).await
    }

    /// Latest Kubernetes version, pre-releases included
    pub async fn latest_kube_version(&mut self) -> Result<String> {
        let url = self.endpoints.latest.clone();
        self.manifest(&url).await
    }

    /// Latest CI build identifier, build metadata intact
    pub async fn latest_ci_build(&mut self) -> Result<String> {
        let url = self.endpoints.ci_latest.clone();
        self.manifest(&url).await
    }

    /// Latest CI build as a package version
    pub async fn kube_ci_version(&mut self) -> Result<String> {
        let build = self.latest_ci_build().await?;
        Ok(ci_version(&build))
    }

    /// cri-tools version matching the stable Kubernetes minor
    pub async fn cri_tools_version(&mut self) -> Result<String> {
        let stable = self.stable_kube_version().await?;
        cri_tools_version(&stable)
    }

    /// Run the named deferred lookup
    pub async fn resolve_id(&mut self, id: ResolverId) -> Result<String> {
        match id {
            ResolverId::StableKube => self.stable_kube_version().await,
            ResolverId::LatestKube => self.latest_kube_version().await,
            ResolverId::KubeCi => self.kube_ci_version().await,
            ResolverId::CriTools => self.cri_tools_version().await,
        }
    }

    /// Download base URL of `version` under `policy`
    pub async fn download_base(&mut self, policy: DownloadBase, version: &str) -> Result<String> {
        match policy {
            DownloadBase::None => Ok(String::new()),
            DownloadBase::Release => Ok(format!(
                "{}/v{}",
                self.endpoints.release_download_base.trim_end_matches('/'),
                version
            )),
            DownloadBase::CiBuilds => {
                let build = self.latest_ci_build().await?;
                Ok(format!("{}/v{}", self.endpoints.ci_download_base.trim_end_matches('/'), build))
            }
        }
    }

    /// Resolve a spec into plain values
    pub async fn resolve(&mut self, spec: &VersionSpec) -> Result<ResolvedVersion> {
        let version = match &spec.version {
            VersionSource::Literal(version) => version.clone(),
            VersionSource::Deferred(id) => self.resolve_id(*id).await?,
        };
        let download_link_base = self.download_base(spec.download_base, &version).await?;

        debug!(
            "Resolved {} spec to version {} (download base {:?})",
            spec.channel, version, download_link_base
        );

        Ok(ResolvedVersion { version, download_link_base })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use k8spkg_core::{Channel, Error};

    use super::*;

    /// Serves canned manifests and records every fetch
    #[derive(Clone, Default)]
    struct MockFetcher {
        responses: HashMap<String, String>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl MockFetcher {
        fn with(mut self, url: &str, body: &str) -> Self {
            self.responses.insert(url.to_string(), body.to_string());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ManifestFetcher for MockFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.calls.lock().unwrap().push(url.to_string());
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| Error::network(url, "404 Not Found"))
        }
    }

    fn mock() -> MockFetcher {
        let endpoints = Endpoints::default();
        MockFetcher::default()
            .with(&endpoints.stable, "v1.20.3\n")
            .with(&endpoints.latest, "v1.21.0-beta.1\n")
            .with(&endpoints.ci_latest, "v1.21.0-alpha.0.123+abcdef\n")
    }

    #[tokio::test]
    async fn test_channel_versions() {
        let mut resolver = VersionResolver::new(mock(), Endpoints::default());

        assert_eq!(resolver.stable_kube_version().await.unwrap(), "1.20.3");
        assert_eq!(resolver.latest_kube_version().await.unwrap(), "1.21.0-beta.1");
        assert_eq!(resolver.kube_ci_version().await.unwrap(), "1.21.0-alpha.0.123-abcdef");
        assert_eq!(resolver.cri_tools_version().await.unwrap(), "1.20.0");
    }

    #[tokio::test]
    async fn test_manifests_fetched_once() {
        let fetcher = mock();
        let mut resolver = VersionResolver::new(fetcher.clone(), Endpoints::default());

        resolver.stable_kube_version().await.unwrap();
        resolver.cri_tools_version().await.unwrap();
        resolver.kube_ci_version().await.unwrap();
        resolver
            .download_base(DownloadBase::CiBuilds, "ignored")
            .await
            .unwrap();

        assert_eq!(fetcher.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_download_bases() {
        let endpoints = Endpoints::with_release_download_base("https://mirror.example/");
        let mut resolver = VersionResolver::new(mock(), endpoints);

        assert_eq!(resolver.download_base(DownloadBase::None, "1.20.3").await.unwrap(), "");
        assert_eq!(
            resolver.download_base(DownloadBase::Release, "1.20.3").await.unwrap(),
            "https://mirror.example/v1.20.3"
        );
        assert_eq!(
            resolver.download_base(DownloadBase::CiBuilds, "1.21.0").await.unwrap(),
            "https://dl.k8s.io/ci-cross/v1.21.0-alpha.0.123+abcdef"
        );
    }

    #[tokio::test]
    async fn test_resolve_spec() {
        let mut resolver = VersionResolver::new(mock(), Endpoints::default());

        let spec = VersionSpec::deferred(ResolverId::StableKube, "00", Channel::Stable)
            .with_download_base(DownloadBase::Release);
        let resolved = resolver.resolve(&spec).await.unwrap();
        assert_eq!(resolved.version, "1.20.3");
        assert_eq!(resolved.download_link_base, "https://dl.k8s.io/v1.20.3");

        let spec = VersionSpec::literal("0.7.5", "00", Channel::Nightly);
        let resolved = resolver.resolve(&spec).await.unwrap();
        assert_eq!(resolved, ResolvedVersion {
            version: "0.7.5".to_string(),
            download_link_base: String::new(),
        });
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let mut resolver = VersionResolver::new(MockFetcher::default(), Endpoints::default());

        let err = resolver.resolve_id(ResolverId::LatestKube).await.unwrap_err();
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_malformed_stable_version() {
        let endpoints = Endpoints::default();
        let fetcher = MockFetcher::default().with(&endpoints.stable, "not-a-version\n");
        let mut resolver = VersionResolver::new(fetcher, endpoints);

        let err = resolver.cri_tools_version().await.unwrap_err();
        assert!(err.is_parse());
    }
}
