//! Run summary models

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// How a stage ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// The stage ran and its program exited cleanly
    Completed,
    /// The completion artifact already existed, so the stage never ran
    Skipped,
    /// The stage failed but its policy let the pipeline proceed
    FailedNonFatal,
    /// The stage failed and terminated the run
    FailedFatal,
}

/// Record of one stage within a run
#[derive(Debug, Clone, Serialize)]
pub struct StageOutcome {
    pub stage: String,
    pub status: StageStatus,
    pub finished_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary of a whole pipeline run
///
/// Stage completion itself is never persisted; it is re-derived from the
/// working directory on every invocation. The report only exists for
/// diagnostics and the machine-readable summary.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub stages: Vec<StageOutcome>,
}

impl RunReport {
    pub fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            started_at: Utc::now(),
            finished_at: None,
            stages: Vec::new(),
        }
    }

    pub fn record(&mut self, stage: &str, status: StageStatus, error: Option<String>) {
        self.stages.push(StageOutcome {
            stage: stage.to_string(),
            status,
            finished_at: Utc::now(),
            error,
        });
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn executed(&self) -> usize {
        self.count(StageStatus::Completed)
    }

    pub fn skipped(&self) -> usize {
        self.count(StageStatus::Skipped)
    }

    pub fn warnings(&self) -> usize {
        self.count(StageStatus::FailedNonFatal)
    }

    /// True when every stage either completed or was skipped
    pub fn is_clean(&self) -> bool {
        self.stages
            .iter()
            .all(|s| matches!(s.status, StageStatus::Completed | StageStatus::Skipped))
    }

    fn count(&self, status: StageStatus) -> usize {
        self.stages.iter().filter(|s| s.status == status).count()
    }
}
