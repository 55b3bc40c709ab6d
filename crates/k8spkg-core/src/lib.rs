//! Core types and error handling for the Kubernetes Debian packager
//!
//! This crate provides the data model shared by the resolver, the template
//! renderer and the build orchestration: release channels, architecture
//! mapping, version specs, build jobs and the error type.

pub mod arch;
pub mod build;
pub mod channel;
pub mod dependency;
pub mod error;
pub mod package;
pub mod version;

pub use arch::to_deb_arch;
pub use build::{BuildResult, BuildStatus};
pub use channel::Channel;
pub use dependency::{package_dependencies, Dependency};
pub use error::{Error, Result};
pub use package::{BuildJob, BuildMatrix, PackageBuild, KNOWN_PACKAGES};
pub use version::{DownloadBase, ResolverId, VersionSource, VersionSpec};
