//! Stage runner - executes one stage and enforces artifact hygiene

use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::{Stage, StageAction};
use crate::invoke::{CommandExecutor, CommandSpec, InvokeError};

/// A stage that did not complete
///
/// Carries the command-level context that ends up in diagnostics: the
/// rendered command, the exit code, and whatever the program wrote to its
/// error stream. No stack traces, only what the operator needs to re-run the
/// stage by hand.
#[derive(Debug, Error)]
#[error("stage {stage} failed: {command} (exit code {code}){detail}", code = render_code(.exit_code), detail = render_detail(.stderr))]
pub struct StageFailure {
    pub stage: &'static str,
    pub command: String,
    pub exit_code: Option<i32>,
    pub stderr: String,
}

fn render_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none".to_string(),
    }
}

fn render_detail(stderr: &str) -> String {
    if stderr.trim().is_empty() {
        String::new()
    } else {
        format!(": {}", stderr.trim())
    }
}

/// Executes single stages against an injected command executor
pub struct StageRunner<E> {
    executor: E,
    working_dir: PathBuf,
}

impl<E: CommandExecutor> StageRunner<E> {
    pub fn new(executor: E, working_dir: PathBuf) -> Self {
        Self {
            executor,
            working_dir,
        }
    }

    pub fn working_dir(&self) -> &PathBuf {
        &self.working_dir
    }

    /// Run a stage to completion
    ///
    /// On any failure the stage's declared output artifacts are deleted
    /// (best-effort) before the failure is reported, so a partial output is
    /// never mistaken for a completed stage by a later invocation.
    pub async fn run(&self, stage: &Stage) -> Result<(), StageFailure> {
        let result = match &stage.action {
            StageAction::Invoke(commands) => self.invoke_all(stage, commands).await,
            StageAction::Carry { from, to } => {
                let from = from.path(&self.working_dir);
                let to = to.path(&self.working_dir);
                debug!("Renaming {} to {}", from.display(), to.display());
                tokio::fs::rename(&from, &to)
                    .await
                    .map_err(|err| StageFailure {
                        stage: stage.id,
                        command: format!("rename {} {}", from.display(), to.display()),
                        exit_code: None,
                        stderr: err.to_string(),
                    })
            }
        };

        if result.is_err() {
            self.discard_outputs(stage).await;
        }
        result
    }

    async fn invoke_all(
        &self,
        stage: &Stage,
        commands: &[CommandSpec],
    ) -> Result<(), StageFailure> {
        for command in commands {
            let invocation = match self.executor.invoke(command).await {
                Ok(invocation) => invocation,
                Err(err) => return Err(spawn_failure(stage, command, err)),
            };

            if !invocation.success() {
                return Err(StageFailure {
                    stage: stage.id,
                    command: command.rendered(),
                    exit_code: invocation.exit_code,
                    stderr: invocation.stderr_lossy().into_owned(),
                });
            }
        }
        Ok(())
    }

    /// Best-effort removal of every declared output of a failed stage
    async fn discard_outputs(&self, stage: &Stage) {
        for artifact in &stage.outputs {
            let path = artifact.path(&self.working_dir);
            match tokio::fs::remove_file(&path).await {
                Ok(()) => debug!("Removed partial artifact {}", path.display()),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => warn!("Could not remove {}: {}", path.display(), err),
            }
        }
    }
}

fn spawn_failure(stage: &Stage, command: &CommandSpec, err: InvokeError) -> StageFailure {
    StageFailure {
        stage: stage.id,
        command: command.rendered(),
        exit_code: None,
        stderr: err.to_string(),
    }
}
