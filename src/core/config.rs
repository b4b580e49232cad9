//! Run configuration
//!
//! A [`RunConfig`] is constructed once from the command line, is immutable
//! for the duration of the run, and is passed explicitly to every component.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::Cli;

/// Configuration for one pipeline invocation
#[derive(Debug, Clone, Serialize)]
pub struct RunConfig {
    /// Assembled contig sequences
    pub assembly: PathBuf,

    /// Read-to-contig alignment in bam format
    pub mapping: PathBuf,

    /// Working directory holding every artifact
    pub working_dir: PathBuf,

    /// Directory holding the bundled stage programs and scripts
    pub tool_dir: PathBuf,

    /// Minimum contig length considered for scaffolding, in base pairs
    pub min_contig_length: u64,

    /// Minimum mate-pair support between contigs to keep a bundled edge
    pub min_mate_support: u64,

    /// Whether the repeat-detection branch runs
    pub repeats: bool,

    /// Whether intermediate artifacts are kept after a successful run
    pub keep_temps: bool,

    /// Whether the visualization export runs
    pub visualization: bool,
}

impl RunConfig {
    /// Build the run configuration from parsed command-line arguments
    ///
    /// The tool directory defaults to the directory containing the running
    /// executable, which is where the stage programs are installed.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let tool_dir = match &cli.tools {
            Some(dir) => dir.clone(),
            None => default_tool_dir().context("Failed to locate the stage-program directory")?,
        };

        Ok(Self {
            assembly: cli.assembly.clone(),
            mapping: cli.mapping.clone(),
            working_dir: cli.dir.clone(),
            tool_dir,
            min_contig_length: cli.length,
            min_mate_support: cli.bsize,
            repeats: cli.repeats,
            keep_temps: cli.keep,
            visualization: cli.visualization,
        })
    }

    /// Path of a bundled stage program or script
    pub fn tool(&self, name: &str) -> PathBuf {
        self.tool_dir.join(name)
    }
}

fn default_tool_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Cannot resolve the current executable")?;
    let dir = exe
        .parent()
        .context("The current executable has no parent directory")?;
    Ok(dir.to_path_buf())
}
