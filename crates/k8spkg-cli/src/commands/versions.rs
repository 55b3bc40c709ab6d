//! Versions command implementation

use std::path::PathBuf;

use color_eyre::eyre::{eyre, Context, Result};
use k8spkg_build::BuildOrchestrator;
use k8spkg_config::parse_list;
use k8spkg_debian::DpkgBuildpackage;
use k8spkg_resolver::HttpFetcher;
use tracing::info;

use super::load_config;

/// Resolves every (package, channel) spec and prints the outcome
pub struct VersionsCommand {
    config_path: Option<PathBuf>,
    kube_version: Option<String>,
    packages: Option<String>,
    release_download_link_base: Option<String>,
}

impl VersionsCommand {
    pub fn new(
        config_path: Option<PathBuf>,
        kube_version: Option<String>,
        packages: Option<String>,
        release_download_link_base: Option<String>,
    ) -> Self {
        Self { config_path, kube_version, packages, release_download_link_base }
    }

    pub async fn execute(&self) -> Result<()> {
        let mut config = load_config(self.config_path.as_deref())?;
        if let Some(version) = &self.kube_version {
            config.kube_version = Some(version.clone());
        }
        if let Some(packages) = &self.packages {
            config.packages = parse_list(packages);
        }
        if let Some(base) = &self.release_download_link_base {
            config.release_download_link_base = base.clone();
        }
        config.validate().context("Invalid options")?;

        info!("Resolving versions for {} packages", config.packages.len());

        let fetcher = HttpFetcher::new().context("Failed to create HTTP client")?;
        let mut orchestrator = BuildOrchestrator::new(config, fetcher, DpkgBuildpackage::new());
        let versions = orchestrator
            .resolve_versions()
            .await
            .map_err(|e| eyre!("Version resolution failed: {}", e))?;

        println!("{:<16} {:<9} {:<32} DOWNLOAD BASE", "PACKAGE", "CHANNEL", "VERSION");
        for entry in &versions {
            let base = match entry.resolved.download_link_base.as_str() {
                "" => "-",
                base => base,
            };
            println!(
                "{:<16} {:<9} {:<32} {}",
                entry.package,
                entry.channel.as_str(),
                entry.resolved.version,
                base
            );
        }

        Ok(())
    }
}
