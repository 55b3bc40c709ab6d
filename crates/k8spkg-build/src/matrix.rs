//! Static build matrix definitions

use k8spkg_config::Config;
use k8spkg_core::package::MINIMUM_CNI_VERSION;
use k8spkg_core::{BuildMatrix, Channel, DownloadBase, PackageBuild, ResolverId, VersionSpec};

/// Build the matrix for `config`: all three channels, or stable only for a
/// pinned Kubernetes version. Filtered to `config.packages`.
pub fn build_matrix(config: &Config) -> BuildMatrix {
    let mut matrix = match config.pinned_version() {
        Some(version) => pinned_matrix(version, &config.distros, &config.revision),
        None => channel_matrix(&config.distros, &config.revision),
    };
    matrix.retain_packages(&config.packages);
    matrix
}

/// kubectl, kubelet, kubernetes-cni, kubeadm and cri-tools on every channel
pub fn channel_matrix(distros: &[String], revision: &str) -> BuildMatrix {
    let kube = || kube_channel_specs(revision);

    BuildMatrix::new(vec![
        PackageBuild::new("kubectl", distros.to_vec(), kube()),
        PackageBuild::new("kubelet", distros.to_vec(), kube()),
        PackageBuild::new(
            "kubernetes-cni",
            distros.to_vec(),
            Channel::ALL
                .iter()
                .map(|channel| VersionSpec::literal(MINIMUM_CNI_VERSION, revision, *channel))
                .collect(),
        ),
        PackageBuild::new("kubeadm", distros.to_vec(), kube()),
        PackageBuild::new(
            "cri-tools",
            distros.to_vec(),
            Channel::ALL
                .iter()
                .map(|channel| VersionSpec::deferred(ResolverId::CriTools, revision, *channel))
                .collect(),
        ),
    ])
}

/// Every package on the stable channel only, Kubernetes pinned to `version`
pub fn pinned_matrix(version: &str, distros: &[String], revision: &str) -> BuildMatrix {
    let kube = || {
        vec![VersionSpec::literal(version, revision, Channel::Stable)
            .with_download_base(DownloadBase::Release)]
    };

    BuildMatrix::new(vec![
        PackageBuild::new("kubectl", distros.to_vec(), kube()),
        PackageBuild::new("kubelet", distros.to_vec(), kube()),
        PackageBuild::new(
            "kubernetes-cni",
            distros.to_vec(),
            vec![VersionSpec::literal(MINIMUM_CNI_VERSION, revision, Channel::Stable)],
        ),
        PackageBuild::new("kubeadm", distros.to_vec(), kube()),
        PackageBuild::new(
            "cri-tools",
            distros.to_vec(),
            vec![VersionSpec::deferred(ResolverId::CriTools, revision, Channel::Stable)],
        ),
    ])
}

fn kube_channel_specs(revision: &str) -> Vec<VersionSpec> {
    vec![
        VersionSpec::deferred(ResolverId::StableKube, revision, Channel::Stable)
            .with_download_base(DownloadBase::Release),
        VersionSpec::deferred(ResolverId::LatestKube, revision, Channel::Unstable)
            .with_download_base(DownloadBase::Release),
        VersionSpec::deferred(ResolverId::KubeCi, revision, Channel::Nightly)
            .with_download_base(DownloadBase::CiBuilds),
    ]
}
