//! Typed command construction and invocation results

use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use thiserror::Error;

/// Error types for command invocation
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("failed to open capture file {path}: {source}")]
    Capture {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A single external command, built as an explicit argument vector
///
/// Commands are never composed through a shell, so paths containing shell
/// metacharacters are passed verbatim as single arguments.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    program: OsString,
    args: Vec<OsString>,
    stdout_to: Option<PathBuf>,
}

impl CommandSpec {
    /// Start building a command for `program`
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdout_to: None,
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Redirect the command's stdout into a file
    ///
    /// Used by stages whose contract is "the output artifact is stdout".
    pub fn stdout_to(mut self, path: PathBuf) -> Self {
        self.stdout_to = Some(path);
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    pub fn capture_path(&self) -> Option<&PathBuf> {
        self.stdout_to.as_ref()
    }

    /// Render the command for diagnostics
    pub fn rendered(&self) -> String {
        let mut parts = vec![self.program.to_string_lossy().into_owned()];
        parts.extend(self.args.iter().map(|a| a.to_string_lossy().into_owned()));
        let mut rendered = parts.join(" ");
        if let Some(path) = &self.stdout_to {
            rendered.push_str(" > ");
            rendered.push_str(&path.to_string_lossy());
        }
        rendered
    }
}

/// Outcome of one command invocation
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Exit code, `None` when the process was killed by a signal
    pub exit_code: Option<i32>,

    /// Captured stdout (empty when redirected to a file)
    pub stdout: Vec<u8>,

    /// Captured stderr
    pub stderr: Vec<u8>,
}

impl Invocation {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn stdout_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    pub fn stderr_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }
}
