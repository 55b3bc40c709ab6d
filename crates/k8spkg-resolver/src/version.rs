//! Pure transformations of fetched version strings

use k8spkg_core::{Error, Result};

/// Strip surrounding whitespace and a leading `v` from a manifest body
pub fn clean_version(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed.strip_prefix('v').unwrap_or(trimmed).to_string()
}

/// Turn a CI build identifier into a valid package version.
///
/// CI builds carry `+<commit>` build metadata; only the first `+` is
/// replaced with `-`.
pub fn ci_version(build: &str) -> String {
    build.replacen('+', "-", 1)
}

/// cri-tools are released per Kubernetes minor: `<major>.<minor>.0`
pub fn cri_tools_version(kube_version: &str) -> Result<String> {
    let parsed = semver::Version::parse(kube_version).map_err(|e| Error::parse(kube_version, e))?;
    Ok(format!("{}.{}.0", parsed.major, parsed.minor))
}
