//! Init command implementation

use std::path::PathBuf;

use color_eyre::eyre::{eyre, Context, Result};
use k8spkg_config::Config;
use tracing::info;

/// Init command implementation
pub struct InitCommand {
    output_path: PathBuf,
    force: bool,
}

impl InitCommand {
    pub fn new(output_path: PathBuf, force: bool) -> Self {
        Self { output_path, force }
    }

    pub async fn execute(&self) -> Result<()> {
        info!("Initializing configuration file at {}", self.output_path.display());

        if self.output_path.exists() && !self.force {
            return Err(eyre!(
                "Configuration file already exists: {}. Use --force to overwrite.",
                self.output_path.display()
            ));
        }

        let yaml_content = serde_yaml::to_string(&Config::default())
            .with_context(|| "Failed to serialize config to YAML")?;

        std::fs::write(&self.output_path, yaml_content)
            .with_context(|| format!("Failed to write config to {}", self.output_path.display()))?;

        println!("✓ Created configuration file: {}", self.output_path.display());
        println!("\nNext steps:");
        println!("1. Point templates_dir at your <distro>/<package> template trees");
        println!(
            "2. Run 'k8spkgctl validate -c {}' to check templates and tools",
            self.output_path.display()
        );
        println!("3. Run 'k8spkgctl build -c {}' to build packages", self.output_path.display());

        Ok(())
    }
}
