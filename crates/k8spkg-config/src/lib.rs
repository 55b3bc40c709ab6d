//! Configuration management for the Kubernetes Debian packager
//!
//! This crate handles YAML configuration parsing, validation and
//! environment variable substitution in paths. The resulting [`Config`] is
//! built once at startup and passed down to every stage of a run.

use std::path::{Path, PathBuf};

use k8spkg_core::error::{Error, Result};
use k8spkg_core::KNOWN_PACKAGES;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default configuration file name, picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "k8spkg.yaml";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Architectures to build for, in release naming
    pub architectures: Vec<String>,

    /// Debian and Ubuntu codenames to build for
    pub distros: Vec<String>,

    /// Packages to build, in matrix order
    pub packages: Vec<String>,

    /// Build a single explicit Kubernetes version on the stable channel
    pub kube_version: Option<String>,

    /// Debian package revision
    pub revision: String,

    /// Base URL of Kubernetes release downloads
    pub release_download_link_base: String,

    /// Root holding the `<distro>/<package>` template trees
    pub templates_dir: PathBuf,

    /// Root of the `<channel>/<distro>` output tree
    pub output_dir: PathBuf,

    /// Parent for staging directories (system temp dir when unset)
    pub tmp_dir: Option<PathBuf>,

    /// Keep staging directories after each job
    pub keep_tmp: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            architectures: to_strings(&["amd64", "arm", "arm64", "ppc64le", "s390x"]),
            distros: to_strings(&["bionic", "xenial", "trusty", "stretch", "jessie", "sid"]),
            packages: to_strings(&KNOWN_PACKAGES),
            kube_version: None,
            revision: "00".to_string(),
            release_download_link_base: "https://dl.k8s.io".to_string(),
            templates_dir: PathBuf::from("."),
            output_dir: PathBuf::from("bin"),
            tmp_dir: None,
            keep_tmp: false,
        }
    }
}

impl Config {
    /// Load and validate configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, else the default file if present, else defaults.
    ///
    /// The result is not validated; callers layer their overrides on top
    /// and validate once.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::read_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// Parse a YAML file and expand environment variables in its paths
    fn read_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("Failed to read config file {path:?}: {e}"),
        })?;

        let mut config = Self::from_yaml(&content)?;
        config.expand_env_vars()?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from YAML without expansion or validation
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::Config { message: format!("Failed to parse YAML: {e}") })
    }

    /// Expand environment variables in paths
    fn expand_env_vars(&mut self) -> Result<()> {
        self.templates_dir = expand_path(&self.templates_dir)?;
        self.output_dir = expand_path(&self.output_dir)?;

        if let Some(ref mut tmp_dir) = self.tmp_dir {
            *tmp_dir = expand_path(tmp_dir)?;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.architectures.is_empty() {
            return Err(Error::config("at least one architecture is required"));
        }
        if self.architectures.iter().any(|a| a.trim().is_empty()) {
            return Err(Error::config("architecture names cannot be empty"));
        }

        if self.distros.is_empty() {
            return Err(Error::config("at least one distro is required"));
        }
        if self.distros.iter().any(|d| d.trim().is_empty()) {
            return Err(Error::config("distro names cannot be empty"));
        }

        if self.packages.is_empty() {
            return Err(Error::config("at least one package is required"));
        }

        for package in &self.packages {
            if !KNOWN_PACKAGES.contains(&package.as_str()) {
                return Err(Error::Config {
                    message: format!(
                        "Unknown package {package:?}, expected one of: {}",
                        KNOWN_PACKAGES.join(", ")
                    ),
                });
            }
        }

        if self.revision.trim().is_empty() {
            return Err(Error::config("revision cannot be empty"));
        }

        if let Some(version) = &self.kube_version {
            if version.trim().is_empty() {
                return Err(Error::config("kube_version cannot be empty when set"));
            }
        }

        let base = &self.release_download_link_base;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(Error::Config {
                message: format!("release_download_link_base must be an http(s) URL: {base}"),
            });
        }

        Ok(())
    }

    /// Pinned Kubernetes version with any leading `v` removed
    pub fn pinned_version(&self) -> Option<&str> {
        self.kube_version
            .as_deref()
            .map(|v| v.trim())
            .map(|v| v.strip_prefix('v').unwrap_or(v))
    }

    /// Source tree for `package` on `distro`
    pub fn template_source(&self, distro: &str, package: &str) -> PathBuf {
        self.templates_dir.join(distro).join(package)
    }
}

/// Split a comma separated CLI list, dropping empty entries
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Expand environment variables in a path
fn expand_path(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_string_lossy();
    let env_var_re = Regex::new(r"\$\{([^}]+)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .map_err(|e| Error::config(format!("Invalid expansion pattern: {e}")))?;

    let mut result = path_str.to_string();
    for cap in env_var_re.captures_iter(&path_str) {
        let Some(var_name) = cap.get(1).or_else(|| cap.get(2)).map(|m| m.as_str()) else {
            continue;
        };
        let var_value = std::env::var(var_name).map_err(|_| Error::Config {
            message: format!("Environment variable not found: {var_name}"),
        })?;

        result = result.replace(&cap[0], &var_value);
    }

    Ok(PathBuf::from(result))
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
