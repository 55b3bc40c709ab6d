//! Debian packaging support for the Kubernetes Debian packager
//!
//! This crate turns one resolved build job into a placed `.deb`:
//!
//! - **Templates**: every file of a `<distro>/<package>` source tree is a
//!   template rendered against the job ([`template`], [`helpers`])
//! - **Staging**: rendering happens in a scoped temporary directory that is
//!   removed on drop unless kept for debugging ([`staging`], [`render`])
//! - **Packaging**: `dpkg-buildpackage` runs in the staging directory
//!   ([`packager`])
//! - **Placement**: the produced `.deb` is moved to
//!   `<output>/<channel>/<distro>` ([`artifact`])
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! # async fn example() -> k8spkg_core::Result<()> {
//! use k8spkg_core::{BuildJob, Channel, VersionSpec};
//! use k8spkg_debian::{
//!     ArtifactPlacer, DpkgBuildpackage, HelperRegistry, Packager, StagingDir, TemplateContext,
//!     TreeRenderer,
//! };
//!
//! let spec = VersionSpec::literal("1.20.0", "00", Channel::Stable);
//! let job = BuildJob::new("kubectl", "bionic", "amd64", &spec, "1.20.0", "", "");
//!
//! let staging = StagingDir::create(None, &job.package, false)?;
//! let helpers = HelperRegistry::with_builtins();
//! let context = TemplateContext::from_serialize(&job)?;
//! TreeRenderer::new(&helpers).render_tree(Path::new("bionic/kubectl"), staging.path(), &context)?;
//!
//! DpkgBuildpackage::new().package(staging.path(), &job).await?;
//! let artifact = ArtifactPlacer::new("bin").place(staging.root(), &job)?;
//! println!("built {}", artifact.path.display());
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod error;
pub mod helpers;
pub mod packager;
pub mod render;
pub mod staging;
pub mod template;

pub use artifact::{ArtifactPlacer, BuildArtifact};
pub use error::TemplateError;
pub use helpers::HelperRegistry;
pub use packager::{DpkgBuildpackage, Packager};
pub use render::TreeRenderer;
pub use staging::StagingDir;
pub use template::{Template, TemplateContext};
