//! Per-job result tracking

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::package::BuildJob;

/// Result of running one build job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildResult {
    /// `<package>_<version>-<revision>_<debArch>` for the job
    pub label: String,

    /// Build status
    pub status: BuildStatus,

    /// Start time
    pub start_time: DateTime<Utc>,

    /// End time
    pub end_time: DateTime<Utc>,

    /// Duration in seconds
    pub duration_secs: f64,

    /// Placed .deb file
    pub deb_file: Option<PathBuf>,

    /// Error message if failed
    pub error: Option<String>,
}

/// Build status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
    /// Job has not started
    Queued,

    /// Rendering, packaging or placing
    InProgress,

    /// Artifact placed
    Success,

    /// Job aborted
    Failed,
}

impl BuildResult {
    /// Create a queued result for `job`
    pub fn new(job: &BuildJob) -> Self {
        let now = Utc::now();
        let label = job.deb_file_name().trim_end_matches(".deb").to_string();
        Self {
            label,
            status: BuildStatus::Queued,
            start_time: now,
            end_time: now,
            duration_secs: 0.0,
            deb_file: None,
            error: None,
        }
    }

    /// Mark build as started
    pub fn start(&mut self) {
        self.status = BuildStatus::InProgress;
        self.start_time = Utc::now();
    }

    /// Mark build as completed successfully
    pub fn succeed(&mut self, deb_file: PathBuf) {
        self.status = BuildStatus::Success;
        self.finish();
        self.deb_file = Some(deb_file);
    }

    /// Mark build as failed
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = BuildStatus::Failed;
        self.finish();
        self.error = Some(error.into());
    }

    fn finish(&mut self) {
        self.end_time = Utc::now();
        self.duration_secs = (self.end_time - self.start_time).num_milliseconds() as f64 / 1000.0;
    }
}

impl BuildStatus {
    /// Check if the build is complete
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }

    /// Check if the build was successful
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}
