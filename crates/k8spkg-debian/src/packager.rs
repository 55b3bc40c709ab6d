//! Invocation of the Debian packaging tool

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use k8spkg_core::{BuildJob, Error, Result};
use tokio::process::Command;
use tracing::{debug, info};

/// Builds a binary package from a rendered staging directory
#[async_trait]
pub trait Packager: Send + Sync {
    /// Package the sources in `staging` for `job`.
    ///
    /// On success the `.deb` named by [`BuildJob::deb_file_name`] exists in
    /// the parent of `staging`.
    async fn package(&self, staging: &Path, job: &BuildJob) -> Result<()>;
}

/// `dpkg-buildpackage -us -uc -b -a<debArch>`
#[derive(Debug, Clone)]
pub struct DpkgBuildpackage {
    program: PathBuf,
}

impl DpkgBuildpackage {
    pub const PROGRAM: &'static str = "dpkg-buildpackage";

    pub fn new() -> Self {
        Self { program: PathBuf::from(Self::PROGRAM) }
    }

    /// Use a different executable with the same command line
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    /// Arguments for a binary-only, unsigned build of `deb_arch`
    pub fn args(deb_arch: &str) -> Vec<String> {
        vec!["-us".to_string(), "-uc".to_string(), "-b".to_string(), format!("-a{deb_arch}")]
    }
}

impl Default for DpkgBuildpackage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Packager for DpkgBuildpackage {
    async fn package(&self, staging: &Path, job: &BuildJob) -> Result<()> {
        let args = Self::args(&job.deb_arch);
        let command_line = format!("{} {}", self.program.display(), args.join(" "));
        info!("Running {} in {}", command_line, staging.display());

        let status = Command::new(&self.program)
            .args(&args)
            .current_dir(staging)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| Error::process(&command_line, e))?;

        if !status.success() {
            return Err(Error::process(command_line, format!("exited with {status}")));
        }

        debug!("{} finished for {}", Self::PROGRAM, job.package);
        Ok(())
    }
}
