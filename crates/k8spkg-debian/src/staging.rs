//! Scoped staging directories

use std::fs;
use std::path::{Path, PathBuf};

use k8spkg_core::{Error, Result};
use tempfile::TempDir;
use tracing::{debug, info};

const TEMP_PREFIX: &str = "debs";

/// Temporary root holding one job's staging directory.
///
/// The layout is `<root>/<package>/`: the renderer fills the package
/// directory and `dpkg-buildpackage` writes its results into `<root>`.
/// The whole root is removed on drop unless the guard was created with
/// `keep` set.
#[derive(Debug)]
pub struct StagingDir {
    root: Option<TempDir>,
    root_path: PathBuf,
    staging: PathBuf,
    keep: bool,
}

impl StagingDir {
    /// Create a fresh root under `parent` (system temp dir when `None`)
    pub fn create(parent: Option<&Path>, package: &str, keep: bool) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_PREFIX);

        let root = match parent {
            Some(parent) => builder
                .tempdir_in(parent)
                .map_err(|e| Error::filesystem(parent, e))?,
            None => builder
                .tempdir()
                .map_err(|e| Error::filesystem(std::env::temp_dir(), e))?,
        };

        let root_path = root.path().to_path_buf();
        let staging = root_path.join(package);
        fs::create_dir(&staging).map_err(|e| Error::filesystem(&staging, e))?;

        debug!("Created staging directory {}", staging.display());
        Ok(Self { root: Some(root), root_path, staging, keep })
    }

    /// Directory the package sources are rendered into
    pub fn path(&self) -> &Path {
        &self.staging
    }

    /// Parent of the staging directory, where build results land
    pub fn root(&self) -> &Path {
        &self.root_path
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        let Some(root) = self.root.take() else {
            return;
        };

        if self.keep {
            let path = root.keep();
            info!("Keeping staging directory {}", path.display());
        } else if let Err(e) = root.close() {
            tracing::warn!("Failed to remove staging directory {}: {}", self.root_path.display(), e);
        }
    }
}
