//! Version resolution for Kubernetes release channels
//!
//! Versions are published as plaintext manifests under `dl.k8s.io`. This
//! crate fetches them through a [`ManifestFetcher`], cleans them up and
//! derives the component specific values (CI build version, cri-tools
//! version, download base URLs). Every manifest is fetched at most once per
//! [`VersionResolver`].

pub mod fetcher;
pub mod resolver;
pub mod version;

pub use fetcher::{HttpFetcher, ManifestFetcher};
pub use resolver::{Endpoints, ResolvedVersion, VersionResolver};
pub use version::{ci_version, clean_version, cri_tools_version};
