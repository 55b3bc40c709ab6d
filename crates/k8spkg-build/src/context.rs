//! Run statistics

use std::time::Duration;

use chrono::{DateTime, Utc};
use k8spkg_core::{BuildResult, BuildStatus};

/// Results of the jobs run so far
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    results: Vec<BuildResult>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
}

impl BuildContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of the run
    pub fn start(&mut self) {
        self.start_time = Some(Utc::now());
        self.end_time = None;
    }

    /// Mark the end of the run
    pub fn finish(&mut self) {
        self.end_time = Some(Utc::now());
    }

    pub fn add_result(&mut self, result: BuildResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[BuildResult] {
        &self.results
    }

    pub fn built(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == BuildStatus::Failed)
            .count()
    }

    /// Wall time of the run, up to now while still running
    pub fn duration(&self) -> Option<Duration> {
        let start = self.start_time?;
        let end = self.end_time.unwrap_or_else(Utc::now);
        (end - start).to_std().ok()
    }

    /// One line summary of the run
    pub fn summary(&self) -> String {
        let duration = self
            .duration()
            .map(|d| format!(" in {:.1}s", d.as_secs_f32()))
            .unwrap_or_default();

        if self.failed() == 0 {
            format!("Built {} packages{}", self.built(), duration)
        } else {
            format!("Built {} packages{}, {} failed", self.built(), duration, self.failed())
        }
    }
}
