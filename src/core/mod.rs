//! Core domain models for the scaffolding pipeline
//!
//! This module defines the fundamental data structures that represent the
//! run configuration, the working-directory artifacts, and the stage graph.

pub mod artifact;
pub mod config;
pub mod graph;
pub mod report;
pub mod stage;

pub use artifact::Artifact;
pub use config::RunConfig;
pub use graph::build_stages;
pub use report::{RunReport, StageOutcome, StageStatus};
pub use stage::{FailurePolicy, Stage, StageAction};
