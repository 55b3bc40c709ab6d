//! Build matrix and build job representation

use serde::{Deserialize, Serialize};

use crate::arch::to_deb_arch;
use crate::channel::Channel;
use crate::version::VersionSpec;

/// Packages this tool knows how to build, in matrix order
pub const KNOWN_PACKAGES: [&str; 5] = ["kubectl", "kubelet", "kubernetes-cni", "kubeadm", "cri-tools"];

/// Oldest Kubernetes release the packages declare compatibility with
pub const MINIMUM_STABLE_KUBERNETES_VERSION: &str = "1.12.0";

/// CNI plugins version shipped in kubernetes-cni
pub const MINIMUM_CNI_VERSION: &str = "0.7.5";

/// One package with its target distributions and channel specs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageBuild {
    /// Package name
    pub package: String,

    /// Distributions to build for
    pub distros: Vec<String>,

    /// One spec per release channel
    pub versions: Vec<VersionSpec>,
}

impl PackageBuild {
    pub fn new(package: impl Into<String>, distros: Vec<String>, versions: Vec<VersionSpec>) -> Self {
        Self { package: package.into(), distros, versions }
    }
}

/// Ordered list of package builds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildMatrix {
    pub builds: Vec<PackageBuild>,
}

impl BuildMatrix {
    pub fn new(builds: Vec<PackageBuild>) -> Self {
        Self { builds }
    }

    /// Keep only the named packages, preserving matrix order
    pub fn retain_packages(&mut self, packages: &[String]) {
        self.builds.retain(|b| packages.iter().any(|p| p == &b.package));
    }

    /// Number of jobs the matrix expands to for one architecture
    pub fn jobs_per_arch(&self) -> usize {
        self.builds
            .iter()
            .map(|b| b.distros.len() * b.versions.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.builds.is_empty()
    }
}

/// A fully resolved unit of work.
///
/// Serialized field names are the keys available to package templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BuildJob {
    pub package: String,
    pub distro_name: String,
    pub arch: String,
    pub deb_arch: String,
    pub version: String,
    pub revision: String,
    pub channel: Channel,
    pub download_link_base: String,
    pub dependencies: String,
}

impl BuildJob {
    /// Assemble a job for `arch`, deriving the dpkg architecture name
    pub fn new(
        package: impl Into<String>,
        distro: impl Into<String>,
        arch: impl Into<String>,
        spec: &VersionSpec,
        version: impl Into<String>,
        download_link_base: impl Into<String>,
        dependencies: impl Into<String>,
    ) -> Self {
        let arch = arch.into();
        let deb_arch = to_deb_arch(&arch).to_string();
        Self {
            package: package.into(),
            distro_name: distro.into(),
            arch,
            deb_arch,
            version: version.into(),
            revision: spec.revision.clone(),
            channel: spec.channel,
            download_link_base: download_link_base.into(),
            dependencies: dependencies.into(),
        }
    }

    /// Name of the `.deb` produced by dpkg-buildpackage for this job
    pub fn deb_file_name(&self) -> String {
        format!("{}_{}-{}_{}.deb", self.package, self.version, self.revision, self.deb_arch)
    }
}
