//! Placement of built packages into the output tree

use std::fs;
use std::path::{Path, PathBuf};

use k8spkg_core::{BuildJob, Error, Result};
use tracing::{debug, info};
use walkdir::WalkDir;

/// A `.deb` in the output tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifact {
    /// Package name
    pub package_name: String,
    /// Artifact file path
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Upstream version
    pub version: String,
    /// Debian revision
    pub revision: String,
    /// dpkg architecture
    pub architecture: String,
}

impl BuildArtifact {
    /// Parse artifact information from an existing file.
    ///
    /// Expects `<package>_<version>-<revision>_<arch>.deb`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let filename = path.file_name()?.to_str()?;
        let stem = filename.strip_suffix(".deb")?;

        let parts: Vec<&str> = stem.split('_').collect();
        if parts.len() != 3 {
            return None;
        }
        let (version, revision) = parts[1].rsplit_once('-')?;
        let size = fs::metadata(path).ok()?.len();

        Some(Self {
            package_name: parts[0].to_string(),
            path: path.to_path_buf(),
            size,
            version: version.to_string(),
            revision: revision.to_string(),
            architecture: parts[2].to_string(),
        })
    }

    /// Get the artifact filename
    pub fn filename(&self) -> Option<&str> {
        self.path.file_name()?.to_str()
    }
}

/// Moves built packages to `<output>/<channel>/<distro>/`
#[derive(Debug, Clone)]
pub struct ArtifactPlacer {
    output_dir: PathBuf,
}

impl ArtifactPlacer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self { output_dir: output_dir.into() }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Output directory for `job`
    pub fn destination_dir(&self, job: &BuildJob) -> PathBuf {
        self.output_dir
            .join(job.channel.as_str())
            .join(&job.distro_name)
    }

    /// Move the `.deb` of `job` out of `built_dir`
    pub fn place(&self, built_dir: &Path, job: &BuildJob) -> Result<BuildArtifact> {
        let file_name = job.deb_file_name();
        let source = built_dir.join(&file_name);
        let dest_dir = self.destination_dir(job);

        fs::create_dir_all(&dest_dir).map_err(|e| Error::filesystem(&dest_dir, e))?;

        let dest = dest_dir.join(&file_name);
        move_file(&source, &dest)?;

        let size = fs::metadata(&dest)
            .map_err(|e| Error::filesystem(&dest, e))?
            .len();
        info!("Placed {} ({} bytes)", dest.display(), size);

        Ok(BuildArtifact {
            package_name: job.package.clone(),
            path: dest,
            size,
            version: job.version.clone(),
            revision: job.revision.clone(),
            architecture: job.deb_arch.clone(),
        })
    }

    /// Collect artifacts currently in the output tree
    pub fn collect(&self) -> Result<Vec<BuildArtifact>> {
        let mut artifacts = Vec::new();
        if !self.output_dir.exists() {
            return Ok(artifacts);
        }

        for entry in WalkDir::new(&self.output_dir).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::filesystem(&self.output_dir, e.into()))?;

            if entry.file_type().is_file() {
                if let Some(artifact) = BuildArtifact::from_path(entry.path()) {
                    artifacts.push(artifact);
                }
            }
        }

        Ok(artifacts)
    }
}

/// Rename, falling back to copy and remove across filesystems
fn move_file(source: &Path, dest: &Path) -> Result<()> {
    match fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(e) if !source.is_file() => Err(Error::filesystem(source, e)),
        Err(e) => {
            debug!("rename failed ({}), copying {} instead", e, source.display());
            fs::copy(source, dest).map_err(|e| Error::filesystem(dest, e))?;
            fs::remove_file(source).map_err(|e| Error::filesystem(source, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use k8spkg_core::{Channel, VersionSpec};
    use tempfile::TempDir;

    use super::*;

    fn job(channel: Channel) -> BuildJob {
        let spec = VersionSpec::literal("1.21.0-alpha.0.123-abcdef", "00", channel);
        BuildJob::new("kubeadm", "xenial", "ppc64le", &spec, "1.21.0-alpha.0.123-abcdef", "", "")
    }

    #[test]
    fn test_place_moves_into_channel_distro_dir() {
        let temp = TempDir::new().unwrap();
        let built = temp.path().join("build");
        fs::create_dir(&built).unwrap();
        let job = job(Channel::Nightly);
        fs::write(built.join(job.deb_file_name()), b"deb").unwrap();

        let placer = ArtifactPlacer::new(temp.path().join("bin"));
        let artifact = placer.place(&built, &job).unwrap();

        let expected = temp
            .path()
            .join("bin/nightly/xenial/kubeadm_1.21.0-alpha.0.123-abcdef-00_ppc64el.deb");
        assert_eq!(artifact.path, expected);
        assert!(expected.is_file());
        assert!(!built.join(job.deb_file_name()).exists());
        assert_eq!(artifact.size, 3);
        assert_eq!(artifact.architecture, "ppc64el");
    }

    #[test]
    fn test_place_missing_file_is_filesystem_error() {
        let temp = TempDir::new().unwrap();
        let placer = ArtifactPlacer::new(temp.path().join("bin"));

        let err = placer.place(temp.path(), &job(Channel::Stable)).unwrap_err();
        assert!(err.is_filesystem());
    }

    #[test]
    fn test_artifact_from_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("kubernetes-cni_0.7.5-00_armhf.deb");
        fs::write(&path, b"12345").unwrap();

        let artifact = BuildArtifact::from_path(&path).unwrap();
        assert_eq!(artifact.package_name, "kubernetes-cni");
        assert_eq!(artifact.version, "0.7.5");
        assert_eq!(artifact.revision, "00");
        assert_eq!(artifact.architecture, "armhf");
        assert_eq!(artifact.size, 5);

        assert!(BuildArtifact::from_path(&temp.path().join("README.md")).is_none());
        // Must exist on disk
        assert!(BuildArtifact::from_path(&temp.path().join("kubectl_1.20.0-00_amd64.deb")).is_none());
    }

    #[test]
    fn test_collect_walks_output_tree() {
        let temp = TempDir::new().unwrap();
        let placer = ArtifactPlacer::new(temp.path());
        let dir = temp.path().join("stable/bionic");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("kubectl_1.20.0-00_amd64.deb"), b"a").unwrap();
        fs::write(dir.join("notes.txt"), b"b").unwrap();

        let artifacts = placer.collect().unwrap();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].filename(), Some("kubectl_1.20.0-00_amd64.deb"));
    }
}
