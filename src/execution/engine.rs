//! Pipeline engine - drives the stage graph stage by stage
//!
//! The engine is strictly sequential: each stage is awaited to completion
//! before the next one is considered, and no stage starts before its upstream
//! artifacts exist. A single pipeline instance is assumed to own the working
//! directory for the duration of the run.

use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::core::{RunReport, Stage, StageStatus};
use crate::execution::ledger::ArtifactLedger;
use crate::execution::runner::{StageFailure, StageRunner};
use crate::invoke::CommandExecutor;

/// Fatal pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Stage(#[from] StageFailure),

    #[error("cannot read working directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Events emitted while the pipeline runs
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    PipelineStarted {
        run_id: Uuid,
        total_stages: usize,
    },
    StageStarted {
        stage: &'static str,
        label: &'static str,
    },
    StageSkipped {
        stage: &'static str,
        artifact: &'static str,
    },
    StageCompleted {
        stage: &'static str,
    },
    StageFailed {
        stage: &'static str,
        fatal: bool,
        error: String,
    },
    PipelineCompleted {
        run_id: Uuid,
        warnings: usize,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(&PipelineEvent) + Send + Sync>;

/// Drives the ordered stage list over an injected command executor
pub struct PipelineEngine<E> {
    runner: StageRunner<E>,
    handlers: Vec<EventHandler>,
}

impl<E: CommandExecutor> PipelineEngine<E> {
    pub fn new(executor: E, working_dir: std::path::PathBuf) -> Self {
        Self {
            runner: StageRunner::new(executor, working_dir),
            handlers: Vec::new(),
        }
    }

    /// Register an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(&PipelineEvent) + Send + Sync + 'static,
    {
        self.handlers.push(Arc::new(handler));
    }

    fn emit(&self, event: PipelineEvent) {
        for handler in &self.handlers {
            handler(&event);
        }
    }

    /// Execute every stage in order
    ///
    /// Completion is re-derived from the artifact ledger scanned here, at the
    /// start of the invocation: stages whose completion artifact already
    /// exists are skipped, which is both the idempotence and the crash-resume
    /// path. A failed Abort stage terminates the run; a failed
    /// WarnAndContinue stage is logged and the pipeline proceeds, which can
    /// leave later stages running on incomplete upstream data; the per-stage
    /// policy table keeps that tradeoff visible.
    pub async fn run(&self, stages: &[Stage]) -> Result<RunReport, PipelineError> {
        let run_id = Uuid::new_v4();
        let ledger = ArtifactLedger::scan(self.runner.working_dir())?;

        info!("Starting scaffolding run {}", run_id);
        self.emit(PipelineEvent::PipelineStarted {
            run_id,
            total_stages: stages.len(),
        });

        let mut report = RunReport::new(run_id);

        for stage in stages {
            if ledger.is_complete(stage) {
                info!(
                    "Skipping {}: {} already exists",
                    stage.id,
                    stage.completion.file_name()
                );
                self.emit(PipelineEvent::StageSkipped {
                    stage: stage.id,
                    artifact: stage.completion.file_name(),
                });
                report.record(stage.id, StageStatus::Skipped, None);
                continue;
            }

            info!("{}", stage.label);
            self.emit(PipelineEvent::StageStarted {
                stage: stage.id,
                label: stage.label,
            });

            match self.runner.run(stage).await {
                Ok(()) => {
                    info!("Finished {}", stage.id);
                    self.emit(PipelineEvent::StageCompleted { stage: stage.id });
                    report.record(stage.id, StageStatus::Completed, None);
                }
                Err(failure) if stage.is_fatal() => {
                    error!("{}", failure);
                    self.emit(PipelineEvent::StageFailed {
                        stage: stage.id,
                        fatal: true,
                        error: failure.to_string(),
                    });
                    report.record(stage.id, StageStatus::FailedFatal, Some(failure.to_string()));
                    return Err(PipelineError::Stage(failure));
                }
                Err(failure) => {
                    warn!("{} (continuing)", failure);
                    self.emit(PipelineEvent::StageFailed {
                        stage: stage.id,
                        fatal: false,
                        error: failure.to_string(),
                    });
                    report.record(
                        stage.id,
                        StageStatus::FailedNonFatal,
                        Some(failure.to_string()),
                    );
                }
            }
        }

        report.finish();
        info!(
            "Run {} finished: {} executed, {} skipped, {} warnings",
            run_id,
            report.executed(),
            report.skipped(),
            report.warnings()
        );
        self.emit(PipelineEvent::PipelineCompleted {
            run_id,
            warnings: report.warnings(),
        });

        Ok(report)
    }
}
