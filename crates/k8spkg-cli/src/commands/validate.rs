//! Validate command implementation

use std::path::PathBuf;

use color_eyre::eyre::{eyre, Result};
use tracing::{error, info, warn};

use super::load_config;

/// Validate command implementation
pub struct ValidateCommand {
    config_path: Option<PathBuf>,
}

impl ValidateCommand {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self { config_path }
    }

    pub async fn execute(&self) -> Result<()> {
        info!("Validating configuration and templates");

        let config = load_config(self.config_path.as_deref())?;
        config.validate()?;
        println!("✓ Configuration loaded successfully");

        let mut missing = 0;
        for distro in &config.distros {
            for package in &config.packages {
                // is_dir() follows symlinked distro directories
                let source = config.template_source(distro, package);
                if source.is_dir() {
                    println!("✓ {}/{}", distro, package);
                } else {
                    error!("Template tree does not exist: {}", source.display());
                    missing += 1;
                }
            }
        }

        if let Some(parent) = config.output_dir.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                warn!("Output directory parent does not exist: {}", parent.display());
            }
        }
        println!("✓ Output directory: {}", config.output_dir.display());

        match which::which("dpkg-buildpackage") {
            Ok(path) => println!("✓ dpkg-buildpackage found: {}", path.display()),
            Err(e) => {
                error!("dpkg-buildpackage not found on PATH: {}", e);
                return Err(eyre!("dpkg-buildpackage is not available"));
            }
        }

        if missing > 0 {
            return Err(eyre!("{} template trees are missing", missing));
        }

        println!("\n✓ All validation checks passed!");
        Ok(())
    }
}
