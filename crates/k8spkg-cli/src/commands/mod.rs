//! CLI command implementations

use std::path::Path;

use color_eyre::eyre::{Context, Result};
use k8spkg_config::Config;

pub mod build;
pub mod clean;
pub mod init;
pub mod validate;
pub mod versions;

pub use build::{BuildArgs, BuildCommand};
pub use clean::CleanCommand;
pub use init::InitCommand;
pub use validate::ValidateCommand;
pub use versions::VersionsCommand;

/// Load the explicit config file, the default one if present, or defaults
fn load_config(path: Option<&Path>) -> Result<Config> {
    Config::load(path).with_context(|| match path {
        Some(path) => format!("Failed to load config from {}", path.display()),
        None => "Failed to load default config".to_string(),
    })
}
