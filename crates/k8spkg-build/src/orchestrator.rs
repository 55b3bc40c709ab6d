//! Build orchestration logic

use async_trait::async_trait;
use k8spkg_config::Config;
use k8spkg_core::{BuildJob, BuildMatrix, BuildResult, Channel, Result};
use k8spkg_debian::Packager;
use k8spkg_resolver::{Endpoints, ManifestFetcher, ResolvedVersion, VersionResolver};
use tracing::{error, info};

use crate::context::BuildContext;
use crate::matrix::build_matrix;
use crate::pipeline::JobPipeline;
use crate::walker::{JobHandler, MatrixWalker};

/// A resolved (package, channel) entry of the matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelVersion {
    pub package: String,
    pub channel: Channel,
    pub resolved: ResolvedVersion,
}

/// Drives a full packaging run
pub struct BuildOrchestrator<F, P> {
    config: Config,
    matrix: BuildMatrix,
    resolver: VersionResolver<F>,
    pipeline: JobPipeline<P>,
    context: BuildContext,
}

impl<F: ManifestFetcher, P: Packager> BuildOrchestrator<F, P> {
    /// Create an orchestrator using the default manifest endpoints
    pub fn new(config: Config, fetcher: F, packager: P) -> Self {
        let endpoints = Endpoints::with_release_download_base(config.release_download_link_base.clone());
        Self::with_endpoints(config, fetcher, packager, endpoints)
    }

    pub fn with_endpoints(config: Config, fetcher: F, packager: P, endpoints: Endpoints) -> Self {
        let matrix = build_matrix(&config);
        let pipeline = JobPipeline::new(&config, packager);
        Self {
            config,
            matrix,
            resolver: VersionResolver::new(fetcher, endpoints),
            pipeline,
            context: BuildContext::new(),
        }
    }

    pub fn matrix(&self) -> &BuildMatrix {
        &self.matrix
    }

    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    /// Run every job of the matrix, aborting at the first failure
    pub async fn build(&mut self) -> Result<&BuildContext> {
        let walker = MatrixWalker::new(&self.matrix, &self.config.architectures);
        info!(
            "Building {} packages for {} architectures ({} jobs)",
            self.matrix.builds.len(),
            self.config.architectures.len(),
            walker.job_count()
        );

        self.context.start();
        let mut recorder = Recorder { pipeline: &self.pipeline, context: &mut self.context };
        let outcome = walker.walk(&mut self.resolver, &mut recorder).await;
        self.context.finish();

        let handled = outcome?;
        info!("{} ({} jobs)", self.context.summary(), handled);
        Ok(&self.context)
    }

    /// Resolve every spec of the matrix without building anything
    pub async fn resolve_versions(&mut self) -> Result<Vec<ChannelVersion>> {
        let mut versions = Vec::new();

        for build in &self.matrix.builds {
            for spec in &build.versions {
                let resolved = self.resolver.resolve(spec).await?;
                versions.push(ChannelVersion {
                    package: build.package.clone(),
                    channel: spec.channel,
                    resolved,
                });
            }
        }

        Ok(versions)
    }
}

/// Runs each walked job through the pipeline and records the outcome
struct Recorder<'a, P> {
    pipeline: &'a JobPipeline<P>,
    context: &'a mut BuildContext,
}

#[async_trait]
impl<'a, P: Packager> JobHandler for Recorder<'a, P> {
    async fn handle(&mut self, job: BuildJob) -> Result<()> {
        let mut result = BuildResult::new(&job);
        result.start();

        match self.pipeline.run(&job).await {
            Ok(artifact) => {
                result.succeed(artifact.path);
                self.context.add_result(result);
                Ok(())
            }
            Err(e) => {
                error!("Job {} failed: {}", result.label, e);
                result.fail(e.to_string());
                self.context.add_result(result);
                Err(e)
            }
        }
    }
}
