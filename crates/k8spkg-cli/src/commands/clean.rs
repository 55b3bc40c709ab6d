//! Clean command implementation

use std::path::PathBuf;

use color_eyre::eyre::{Context, Result};
use k8spkg_debian::ArtifactPlacer;
use tracing::info;

use super::load_config;

/// Removes the output directory
pub struct CleanCommand {
    config_path: Option<PathBuf>,
}

impl CleanCommand {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self { config_path }
    }

    pub async fn execute(&self) -> Result<()> {
        let config = load_config(self.config_path.as_deref())?;
        let placer = ArtifactPlacer::new(&config.output_dir);
        let output_dir = placer.output_dir();

        if !output_dir.exists() {
            info!("Output directory does not exist, nothing to clean: {}", output_dir.display());
            return Ok(());
        }

        info!("Cleaning output directory: {}", output_dir.display());
        let artifacts = placer.collect().context("Failed to scan output directory")?;

        std::fs::remove_dir_all(output_dir).with_context(|| {
            format!("Failed to remove output directory: {}", output_dir.display())
        })?;

        println!("✓ Removed {} ({} packages)", output_dir.display(), artifacts.len());
        Ok(())
    }
}
