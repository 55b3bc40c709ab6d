//! Build orchestration for the Kubernetes Debian packager
//!
//! This crate expands the static build matrix into concrete jobs and runs
//! each job through render → package → place, one at a time.

pub mod context;
pub mod matrix;
pub mod orchestrator;
pub mod pipeline;
pub mod walker;

pub use context::BuildContext;
pub use matrix::{build_matrix, channel_matrix, pinned_matrix};
pub use orchestrator::{BuildOrchestrator, ChannelVersion};
pub use pipeline::JobPipeline;
pub use walker::{JobHandler, MatrixWalker};
