//! Expansion of the build matrix into concrete jobs

use async_trait::async_trait;
use k8spkg_core::{package_dependencies, BuildJob, BuildMatrix, Result};
use k8spkg_resolver::{ManifestFetcher, VersionResolver};
use tracing::debug;

/// Receives each resolved job in matrix order
#[async_trait]
pub trait JobHandler: Send {
    async fn handle(&mut self, job: BuildJob) -> Result<()>;
}

/// Walks architectures × packages × distros × version specs
#[derive(Debug, Clone, Copy)]
pub struct MatrixWalker<'a> {
    matrix: &'a BuildMatrix,
    architectures: &'a [String],
}

impl<'a> MatrixWalker<'a> {
    pub fn new(matrix: &'a BuildMatrix, architectures: &'a [String]) -> Self {
        Self { matrix, architectures }
    }

    /// Total number of jobs the walk produces
    pub fn job_count(&self) -> usize {
        self.architectures.len() * self.matrix.jobs_per_arch()
    }

    /// Resolve and hand over every job, stopping at the first error.
    ///
    /// Returns the number of jobs handled.
    pub async fn walk<F, H>(&self, resolver: &mut VersionResolver<F>, handler: &mut H) -> Result<usize>
    where
        F: ManifestFetcher,
        H: JobHandler,
    {
        let mut handled = 0;

        for arch in self.architectures {
            for build in &self.matrix.builds {
                let dependencies = package_dependencies(&build.package);

                for distro in &build.distros {
                    for spec in &build.versions {
                        let resolved = resolver.resolve(spec).await?;
                        let job = BuildJob::new(
                            &build.package,
                            distro,
                            arch,
                            spec,
                            resolved.version,
                            resolved.download_link_base,
                            dependencies.clone(),
                        );

                        debug!("Job {}/{}: {:?}", handled + 1, self.job_count(), job);
                        handler.handle(job).await?;
                        handled += 1;
                    }
                }
            }
        }

        Ok(handled)
    }
}
