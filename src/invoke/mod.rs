//! External process invocation
//!
//! Stage programs are opaque collaborators judged only by exit status and the
//! files they leave behind. The [`CommandExecutor`] trait is the single seam
//! between the pipeline and the operating system, so tests can drive the
//! controller with a fake executor that simulates success, failure, and
//! artifact creation without running real binaries.

pub mod command;

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

pub use command::{CommandSpec, Invocation, InvokeError};

/// Capability to execute one external command synchronously
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run the command to completion and report its outcome
    async fn invoke(&self, spec: &CommandSpec) -> Result<Invocation, InvokeError>;
}

/// Executor backed by real operating-system processes
#[derive(Debug, Clone, Default)]
pub struct SystemExecutor;

impl SystemExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandExecutor for SystemExecutor {
    async fn invoke(&self, spec: &CommandSpec) -> Result<Invocation, InvokeError> {
        debug!("Invoking: {}", spec.rendered());

        let mut command = Command::new(spec.program());
        command.args(spec.arguments());
        command.stdin(Stdio::null());
        command.stderr(Stdio::piped());
        command.kill_on_drop(true);

        // Stream stdout straight into the capture file when the stage's
        // output artifact is the command's stdout.
        if let Some(path) = spec.capture_path() {
            let file = std::fs::File::create(path).map_err(|source| InvokeError::Capture {
                path: path.clone(),
                source,
            })?;
            command.stdout(Stdio::from(file));
        } else {
            command.stdout(Stdio::piped());
        }

        // `Command::output` would reset stdout to a pipe, undoing the capture-file
        // redirect configured above; spawn and wait instead so the configured
        // stdio is honored.
        let output = command
            .spawn()
            .map_err(|source| InvokeError::Spawn {
                program: spec.program().to_string_lossy().into_owned(),
                source,
            })?
            .wait_with_output()
            .await
            .map_err(|source| InvokeError::Spawn {
                program: spec.program().to_string_lossy().into_owned(),
                source,
            })?;

        debug!(
            "{} exited with {:?}",
            spec.program().to_string_lossy(),
            output.status.code()
        );

        Ok(Invocation {
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
