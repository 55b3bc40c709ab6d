//! End-to-end pipeline tests with a fake packaging tool

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use k8spkg_build::BuildOrchestrator;
use k8spkg_config::Config;
use k8spkg_core::{BuildJob, Channel, Error, Result};
use k8spkg_debian::{ArtifactPlacer, Packager};
use k8spkg_resolver::{Endpoints, ManifestFetcher};
use tempfile::TempDir;

/// Serves canned manifests; unknown URLs fail like a 404
#[derive(Default)]
struct MockFetcher {
    responses: HashMap<String, String>,
}

impl MockFetcher {
    fn with_release_manifests() -> Self {
        let endpoints = Endpoints::default();
        let mut responses = HashMap::new();
        responses.insert(endpoints.stable, "v1.20.3\n".to_string());
        responses.insert(endpoints.latest, "v1.21.0-beta.1\n".to_string());
        responses.insert(endpoints.ci_latest, "v1.21.0-alpha.0.123+abcdef\n".to_string());
        Self { responses }
    }
}

#[async_trait]
impl ManifestFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| Error::network(url, "404 Not Found"))
    }
}

/// Stands in for dpkg-buildpackage: writes the rendered control file into
/// the expected .deb next to the staging directory
#[derive(Clone, Default)]
struct FakePackager {
    calls: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl FakePackager {
    fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Packager for FakePackager {
    async fn package(&self, staging: &Path, job: &BuildJob) -> Result<()> {
        self.calls.lock().unwrap().push(job.deb_file_name());
        if self.fail {
            return Err(Error::process("dpkg-buildpackage", "exited with exit status: 2"));
        }

        let control = fs::read_to_string(staging.join("debian/control"))
            .map_err(|e| Error::filesystem(staging, e))?;
        let parent = staging.parent().unwrap();
        fs::write(parent.join(job.deb_file_name()), control)
            .map_err(|e| Error::filesystem(parent, e))
    }
}

struct Fixture {
    temp: TempDir,
    config: Config,
}

impl Fixture {
    fn new(packages: &[&str], distros: &[&str]) -> Self {
        let temp = TempDir::new().unwrap();
        let templates = temp.path().join("templates");
        for distro in distros {
            for package in packages {
                write_package_tree(&templates.join(distro).join(package));
            }
        }
        fs::create_dir(temp.path().join("tmp")).unwrap();

        let config = Config {
            architectures: vec!["amd64".to_string()],
            distros: distros.iter().map(|d| d.to_string()).collect(),
            packages: packages.iter().map(|p| p.to_string()).collect(),
            kube_version: Some("1.20.0".to_string()),
            templates_dir: templates,
            output_dir: temp.path().join("bin"),
            tmp_dir: Some(temp.path().join("tmp")),
            ..Default::default()
        };

        Self { temp, config }
    }

    fn bin(&self) -> PathBuf {
        self.temp.path().join("bin")
    }

    fn tmp_entries(&self) -> usize {
        fs::read_dir(self.temp.path().join("tmp")).unwrap().count()
    }

    fn artifacts(&self) -> Vec<PathBuf> {
        ArtifactPlacer::new(self.bin())
            .collect()
            .unwrap()
            .into_iter()
            .map(|a| a.path)
            .collect()
    }
}

fn write_package_tree(root: &Path) {
    let debian = root.join("debian");
    fs::create_dir_all(&debian).unwrap();
    fs::write(
        debian.join("control"),
        "Package: {{ .Package }}\nVersion: {{ .Version }}-{{ .Revision }}\nArchitecture: {{ .DebArch }}\nX-Channel: {{ .Channel }}\nX-Download: {{ .DownloadLinkBase }}\n",
    )
    .unwrap();
    fs::write(debian.join("changelog"), "{{ .Package }} ({{ .Version }}) {{ .DistroName }}\n -- {{ date }}\n")
        .unwrap();
}

#[tokio::test]
async fn test_single_job_produces_one_artifact_and_no_temp_dir() {
    let fixture = Fixture::new(&["kubectl"], &["bionic"]);
    let packager = FakePackager::default();
    let mut orchestrator =
        BuildOrchestrator::new(fixture.config.clone(), MockFetcher::default(), packager.clone());

    let context = orchestrator.build().await.unwrap();
    assert_eq!(context.built(), 1);
    assert_eq!(context.failed(), 0);

    let expected = fixture.bin().join("stable/bionic/kubectl_1.20.0-00_amd64.deb");
    assert_eq!(fixture.artifacts(), vec![expected.clone()]);

    let contents = fs::read_to_string(&expected).unwrap();
    assert!(contents.contains("Package: kubectl"));
    assert!(contents.contains("Architecture: amd64"));
    assert!(contents.contains("X-Download: https://dl.k8s.io/v1.20.0"));

    assert_eq!(packager.calls(), vec!["kubectl_1.20.0-00_amd64.deb"]);
    assert_eq!(fixture.tmp_entries(), 0);
}

#[tokio::test]
async fn test_packaging_failure_places_nothing() {
    let fixture = Fixture::new(&["kubectl", "kubelet"], &["bionic"]);
    let packager = FakePackager::failing();
    let mut orchestrator =
        BuildOrchestrator::new(fixture.config.clone(), MockFetcher::default(), packager.clone());

    let err = orchestrator.build().await.unwrap_err();
    assert!(err.is_process());

    // The first failure aborts the run
    assert_eq!(packager.calls().len(), 1);
    assert_eq!(orchestrator.context().failed(), 1);
    assert!(fixture.artifacts().is_empty());
    assert_eq!(fixture.tmp_entries(), 0);
}

#[tokio::test]
async fn test_keep_tmp_retains_staging() {
    let mut fixture = Fixture::new(&["kubectl"], &["bionic"]);
    fixture.config.keep_tmp = true;
    let mut orchestrator =
        BuildOrchestrator::new(fixture.config.clone(), MockFetcher::default(), FakePackager::default());

    orchestrator.build().await.unwrap();

    assert_eq!(fixture.tmp_entries(), 1);
    let root = fs::read_dir(fixture.temp.path().join("tmp"))
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();
    let changelog = fs::read_to_string(root.join("kubectl/debian/changelog")).unwrap();
    assert!(changelog.starts_with("kubectl (1.20.0) bionic"));
}

#[tokio::test]
async fn test_all_channels_for_every_distro() {
    let mut fixture = Fixture::new(&["kubelet", "cri-tools"], &["bionic", "sid"]);
    fixture.config.kube_version = None;
    fixture.config.architectures = vec!["arm".to_string()];
    let mut orchestrator = BuildOrchestrator::new(
        fixture.config.clone(),
        MockFetcher::with_release_manifests(),
        FakePackager::default(),
    );

    let context = orchestrator.build().await.unwrap();
    assert_eq!(context.built(), 12);

    let bin = fixture.bin();
    for distro in ["bionic", "sid"] {
        assert!(bin
            .join(format!("stable/{distro}/kubelet_1.20.3-00_armhf.deb"))
            .is_file());
        assert!(bin
            .join(format!("unstable/{distro}/kubelet_1.21.0-beta.1-00_armhf.deb"))
            .is_file());
        assert!(bin
            .join(format!("nightly/{distro}/kubelet_1.21.0-alpha.0.123-abcdef-00_armhf.deb"))
            .is_file());
        for channel in Channel::ALL {
            assert!(bin
                .join(format!("{channel}/{distro}/cri-tools_1.20.0-00_armhf.deb"))
                .is_file());
        }
    }

    let nightly = fs::read_to_string(
        bin.join("nightly/sid/kubelet_1.21.0-alpha.0.123-abcdef-00_armhf.deb"),
    )
    .unwrap();
    assert!(nightly.contains("X-Download: https://dl.k8s.io/ci-cross/v1.21.0-alpha.0.123+abcdef"));
    assert!(nightly.contains("X-Channel: nightly"));
    assert_eq!(fixture.artifacts().len(), 12);
}

#[tokio::test]
async fn test_missing_template_tree_fails_before_packaging() {
    let mut fixture = Fixture::new(&["kubectl"], &["bionic"]);
    fixture.config.distros = vec!["bionic".to_string(), "focal".to_string()];
    let packager = FakePackager::default();
    let mut orchestrator =
        BuildOrchestrator::new(fixture.config.clone(), MockFetcher::default(), packager.clone());

    let err = orchestrator.build().await.unwrap_err();
    assert!(err.is_filesystem());
    assert_eq!(packager.calls().len(), 1);
    assert_eq!(fixture.artifacts().len(), 1);
    assert_eq!(fixture.tmp_entries(), 0);
}

#[tokio::test]
async fn test_network_failure_aborts_run() {
    let mut fixture = Fixture::new(&["kubectl"], &["bionic"]);
    fixture.config.kube_version = None;
    let packager = FakePackager::default();
    let mut orchestrator =
        BuildOrchestrator::new(fixture.config.clone(), MockFetcher::default(), packager.clone());

    let err = orchestrator.build().await.unwrap_err();
    assert!(err.is_network());
    assert!(packager.calls().is_empty());
}

#[tokio::test]
async fn test_resolve_versions_lists_every_channel() {
    let mut fixture = Fixture::new(&["kubectl", "kubernetes-cni"], &["bionic"]);
    fixture.config.kube_version = None;
    let mut orchestrator = BuildOrchestrator::new(
        fixture.config.clone(),
        MockFetcher::with_release_manifests(),
        FakePackager::default(),
    );

    let versions = orchestrator.resolve_versions().await.unwrap();
    assert_eq!(versions.len(), 6);
    assert_eq!(versions[0].package, "kubectl");
    assert_eq!(versions[0].channel, Channel::Stable);
    assert_eq!(versions[0].resolved.version, "1.20.3");
    assert_eq!(versions[2].resolved.version, "1.21.0-alpha.0.123-abcdef");
    assert_eq!(versions[5].package, "kubernetes-cni");
    assert_eq!(versions[5].resolved.version, "0.7.5");
}
