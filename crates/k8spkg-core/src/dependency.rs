//! Debian `Depends:` entries of the built packages

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::package::{MINIMUM_CNI_VERSION, MINIMUM_STABLE_KUBERNETES_VERSION};

/// A package relation with an optional version constraint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dependency {
    /// Package name or substitution variable (e.g. `${misc:Depends}`)
    pub name: String,

    /// Optional version constraint
    pub version_constraint: Option<VersionConstraint>,
}

/// Version constraint for dependencies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum VersionConstraint {
    /// Minimum version (>=)
    GreaterOrEqual(String),
}

impl Dependency {
    /// Create a dependency without version constraints
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), version_constraint: None }
    }

    /// Create a dependency with a minimum version requirement
    pub fn with_min_version(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version_constraint: Some(VersionConstraint::GreaterOrEqual(version.into())),
        }
    }

    /// Render in `control` file syntax
    pub fn to_debian_dependency(&self) -> String {
        match &self.version_constraint {
            None => self.name.clone(),
            Some(VersionConstraint::GreaterOrEqual(v)) => format!("{} (>= {v})", self.name),
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_debian_dependency())
    }
}

/// Dependencies declared by `package`
pub fn dependencies_for(package: &str) -> Vec<Dependency> {
    match package {
        "kubeadm" => vec![
            Dependency::with_min_version("kubelet", MINIMUM_STABLE_KUBERNETES_VERSION),
            Dependency::with_min_version("kubectl", MINIMUM_STABLE_KUBERNETES_VERSION),
            Dependency::with_min_version("kubernetes-cni", MINIMUM_CNI_VERSION),
            Dependency::with_min_version("cri-tools", MINIMUM_STABLE_KUBERNETES_VERSION),
            Dependency::new("${misc:Depends}"),
        ],
        "kubelet" => vec![Dependency::with_min_version("kubernetes-cni", MINIMUM_CNI_VERSION)],
        _ => Vec::new(),
    }
}

/// Comma separated dependency list for the `Dependencies` template key
pub fn package_dependencies(package: &str) -> String {
    dependencies_for(package)
        .iter()
        .map(Dependency::to_debian_dependency)
        .collect::<Vec<_>>()
        .join(", ")
}
