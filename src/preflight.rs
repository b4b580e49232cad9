//! Dependency preflight
//!
//! Required external commands and the Python graph library are verified once,
//! before any stage runs. Absence is never transient here, so there are no
//! retries: the run terminates with a diagnostic naming the missing
//! dependency.

use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use regex::Regex;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum PreflightError {
    #[error("{name} does not exist in PATH. Terminating...")]
    MissingCommand { name: &'static str },

    #[error("Looks like you do not have {name}. Please rerun with the {name} module installed.")]
    MissingLibrary { name: &'static str },
}

/// Commands every run needs on the search path
const REQUIRED_COMMANDS: [&str; 3] = ["samtools", "bamToBed", "python3"];

/// Whether `name` resolves to an executable file on the search path
///
/// This is a pure probe of the PATH entries; the tool itself is never run.
pub fn command_available(name: &str) -> bool {
    let Some(path) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&path).any(|dir| is_executable(&dir.join(name)))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Probe the installed version of the Python graph library
///
/// The centrality and layout scripts need networkx; importing it in a python
/// subprocess is the only reliable way to see what the scripts will see.
pub async fn graph_library_version(python: &str) -> Option<String> {
    let output = Command::new(python)
        .args(["-c", "import networkx; print(networkx.__version__)"])
        .output()
        .await
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = Regex::new(r"\d+(\.\d+)*")
        .ok()?
        .find(&stdout)
        .map(|m| m.as_str().to_string());
    debug!("Probed networkx version: {:?}", version);
    version
}

/// Verify every required dependency, failing on the first absence
pub async fn check_dependencies() -> Result<(), PreflightError> {
    for name in REQUIRED_COMMANDS {
        if !command_available(name) {
            return Err(PreflightError::MissingCommand { name });
        }
        debug!("Found {} in PATH", name);
    }

    match graph_library_version("python3").await {
        Some(version) => info!("Networkx {} found", version),
        None => return Err(PreflightError::MissingLibrary { name: "networkx" }),
    }

    Ok(())
}
