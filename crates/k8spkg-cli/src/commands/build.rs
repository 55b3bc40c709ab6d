//! Build command implementation

use std::path::PathBuf;

use clap::Args;
use color_eyre::eyre::{eyre, Context, Result};
use k8spkg_build::BuildOrchestrator;
use k8spkg_config::{parse_list, Config};
use k8spkg_debian::DpkgBuildpackage;
use k8spkg_resolver::HttpFetcher;
use tracing::info;

use super::load_config;

/// Options overriding the configuration for a build
#[derive(Args, Debug, Default, Clone)]
pub struct BuildArgs {
    /// Architectures to build for, comma separated
    #[arg(long, value_name = "ARCHS")]
    pub arch: Option<String>,

    /// Distributions to build for, comma separated
    #[arg(long, value_name = "DISTROS")]
    pub distros: Option<String>,

    /// Pin the Kubernetes version instead of resolving channels
    #[arg(long, value_name = "VERSION", env = "K8SPKG_KUBE_VERSION")]
    pub kube_version: Option<String>,

    /// Package revision
    #[arg(long, value_name = "REVISION")]
    pub revision: Option<String>,

    /// Base URL for release downloads
    #[arg(long, value_name = "URL")]
    pub release_download_link_base: Option<String>,

    /// Keep temporary staging directories
    #[arg(long)]
    pub keep_tmp: bool,

    /// Packages to build, comma separated
    #[arg(long, value_name = "PACKAGES")]
    pub packages: Option<String>,

    /// Directory holding <distro>/<package> template trees
    #[arg(long, value_name = "DIR")]
    pub templates_dir: Option<PathBuf>,

    /// Output directory for built packages
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Parent directory for staging directories
    #[arg(long, value_name = "DIR")]
    pub tmp_dir: Option<PathBuf>,
}

impl BuildArgs {
    /// Apply the given flags on top of `config`
    pub fn apply(&self, config: &mut Config) {
        if let Some(arch) = &self.arch {
            config.architectures = parse_list(arch);
        }
        if let Some(distros) = &self.distros {
            config.distros = parse_list(distros);
        }
        if let Some(packages) = &self.packages {
            config.packages = parse_list(packages);
        }
        if let Some(version) = &self.kube_version {
            config.kube_version = Some(version.clone());
        }
        if let Some(revision) = &self.revision {
            config.revision = revision.clone();
        }
        if let Some(base) = &self.release_download_link_base {
            config.release_download_link_base = base.clone();
        }
        if let Some(dir) = &self.templates_dir {
            config.templates_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(dir) = &self.tmp_dir {
            config.tmp_dir = Some(dir.clone());
        }
        if self.keep_tmp {
            config.keep_tmp = true;
        }
    }
}

/// Build command implementation
pub struct BuildCommand {
    config_path: Option<PathBuf>,
    args: BuildArgs,
}

impl BuildCommand {
    pub fn new(config_path: Option<PathBuf>, args: BuildArgs) -> Self {
        Self { config_path, args }
    }

    /// Configuration with flags applied, validated once
    fn config(&self) -> Result<Config> {
        let mut config = load_config(self.config_path.as_deref())?;
        self.args.apply(&mut config);
        config.validate().context("Invalid build options")?;
        Ok(config)
    }

    pub async fn execute(&self) -> Result<()> {
        info!("Starting build process");

        let config = self.config()?;

        println!("✓ Configuration loaded and validated");
        info!("Templates directory: {}", config.templates_dir.display());
        info!("Output directory: {}", config.output_dir.display());
        match config.pinned_version() {
            Some(version) => info!("Kubernetes version pinned to {}", version),
            None => info!("Resolving stable, unstable and nightly versions"),
        }

        let fetcher = HttpFetcher::new().context("Failed to create HTTP client")?;
        let mut orchestrator = BuildOrchestrator::new(config, fetcher, DpkgBuildpackage::new());

        let context =
            orchestrator.build().await.map_err(|e| eyre!("Build failed: {}", e))?;

        for result in context.results() {
            if let Some(deb) = &result.deb_file {
                println!("  {}", deb.display());
            }
        }
        println!("\n✨ {}", context.summary());

        Ok(())
    }
}
