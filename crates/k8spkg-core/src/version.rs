//! Version specs as declared in the build matrix
//!
//! A spec names either a literal version or the resolver that produces one.
//! The walker turns a spec into plain strings before building a job.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::channel::Channel;

/// Identifies a deferred version lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolverId {
    /// `release/stable.txt`
    StableKube,

    /// `release/latest.txt`
    LatestKube,

    /// Latest CI build with `+` build metadata replaced by `-`
    KubeCi,

    /// `<major>.<minor>.0` of the stable Kubernetes version
    CriTools,
}

impl fmt::Display for ResolverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::StableKube => "stable-kube",
            Self::LatestKube => "latest-kube",
            Self::KubeCi => "kube-ci",
            Self::CriTools => "cri-tools",
        };
        f.write_str(name)
    }
}

/// Where the version of a spec comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionSource {
    /// Fixed version string
    Literal(String),

    /// Resolved on first use
    Deferred(ResolverId),
}

/// Policy for the download base URL of a spec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadBase {
    /// No download base; rendered as an empty string
    #[default]
    None,

    /// `<release base>/v<version>`
    Release,

    /// `<ci base>/v<latest CI build>`
    CiBuilds,
}

/// One release-channel entry of a package in the build matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSpec {
    pub version: VersionSource,
    pub revision: String,
    pub channel: Channel,
    pub download_base: DownloadBase,
}

impl VersionSpec {
    /// Spec with a fixed version and no download base
    pub fn literal(version: impl Into<String>, revision: impl Into<String>, channel: Channel) -> Self {
        Self {
            version: VersionSource::Literal(version.into()),
            revision: revision.into(),
            channel,
            download_base: DownloadBase::None,
        }
    }

    /// Spec whose version is looked up by `resolver`
    pub fn deferred(resolver: ResolverId, revision: impl Into<String>, channel: Channel) -> Self {
        Self {
            version: VersionSource::Deferred(resolver),
            revision: revision.into(),
            channel,
            download_base: DownloadBase::None,
        }
    }

    /// Set the download base policy
    pub fn with_download_base(mut self, download_base: DownloadBase) -> Self {
        self.download_base = download_base;
        self
    }
}
