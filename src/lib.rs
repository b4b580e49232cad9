//! metacarvel - a scaffolding pipeline for metagenomic assemblies

pub mod cli;
pub mod core;
pub mod execution;
pub mod invoke;
pub mod preflight;

// Re-export commonly used types
pub use crate::core::{
    Artifact, FailurePolicy, RunConfig, RunReport, Stage, StageAction, StageStatus,
};
pub use execution::{reclaim, ArtifactLedger, PipelineEngine, PipelineError, PipelineEvent};
pub use invoke::{CommandExecutor, CommandSpec, Invocation, InvokeError, SystemExecutor};
