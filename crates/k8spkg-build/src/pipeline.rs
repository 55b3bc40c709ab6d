//! Render → package → place for a single job

use std::path::PathBuf;

use k8spkg_config::Config;
use k8spkg_core::{BuildJob, Error, Result};
use k8spkg_debian::{
    ArtifactPlacer, BuildArtifact, HelperRegistry, Packager, StagingDir, TemplateContext,
    TreeRenderer,
};
use tracing::info;

/// Runs one job to completion
#[derive(Debug)]
pub struct JobPipeline<P> {
    templates_dir: PathBuf,
    tmp_dir: Option<PathBuf>,
    keep_tmp: bool,
    helpers: HelperRegistry,
    packager: P,
    placer: ArtifactPlacer,
}

impl<P: Packager> JobPipeline<P> {
    pub fn new(config: &Config, packager: P) -> Self {
        Self {
            templates_dir: config.templates_dir.clone(),
            tmp_dir: config.tmp_dir.clone(),
            keep_tmp: config.keep_tmp,
            helpers: HelperRegistry::with_builtins(),
            packager,
            placer: ArtifactPlacer::new(config.output_dir.clone()),
        }
    }

    /// Render the job's source tree, package it and place the result
    pub async fn run(&self, job: &BuildJob) -> Result<BuildArtifact> {
        info!(
            "Building {} {} for {}/{} ({})",
            job.package, job.version, job.distro_name, job.arch, job.channel
        );

        let src = self.templates_dir.join(&job.distro_name).join(&job.package);
        if !src.exists() {
            return Err(Error::filesystem(
                &src,
                std::io::Error::new(std::io::ErrorKind::NotFound, "package source tree not found"),
            ));
        }

        let staging = StagingDir::create(self.tmp_dir.as_deref(), &job.package, self.keep_tmp)?;
        let context = TemplateContext::from_serialize(job)?;
        TreeRenderer::new(&self.helpers).render_tree(&src, staging.path(), &context)?;

        self.packager.package(staging.path(), job).await?;

        self.placer.place(staging.root(), job)
    }
}
