//! The resumability ledger
//!
//! The working directory's file set is the only record of pipeline progress:
//! a stage whose completion artifact exists is treated as already done, which
//! is what lets a re-invocation resume after a crash with no separate
//! checkpoint file. The ledger is a snapshot taken once per invocation, so
//! completion is a pure function of (working directory at startup, stage):
//! files written during the current run never feed back into skip decisions,
//! which matters because the two orientation passes share output paths.
//!
//! The predicate is purely local to each stage. If a later stage's output
//! survives while an earlier stage's output was deleted externally, the
//! ledger cannot detect the inconsistency. Existence also implies nothing
//! about content: a truncated artifact from an interrupted run is
//! indistinguishable from a complete one.

use std::collections::HashSet;
use std::io;
use std::path::Path;

use crate::core::{Artifact, Stage};

/// Snapshot of which artifacts existed when the pipeline started
#[derive(Debug, Clone)]
pub struct ArtifactLedger {
    present: HashSet<String>,
}

impl ArtifactLedger {
    /// Scan the working directory once
    ///
    /// A missing directory scans as empty rather than failing, since the
    /// driver creates the directory right after.
    pub fn scan(dir: &Path) -> io::Result<Self> {
        let mut present = HashSet::new();
        match std::fs::read_dir(dir) {
            Ok(entries) => {
                for entry in entries {
                    let entry = entry?;
                    if entry.file_type()?.is_file() {
                        if let Ok(name) = entry.file_name().into_string() {
                            present.insert(name);
                        }
                    }
                }
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err),
        }
        Ok(Self { present })
    }

    /// An empty ledger, as if the working directory held nothing
    pub fn empty() -> Self {
        Self {
            present: HashSet::new(),
        }
    }

    /// Whether the artifact existed at scan time
    pub fn exists(&self, artifact: Artifact) -> bool {
        self.present.contains(artifact.file_name())
    }

    /// Whether the stage's completion artifact existed at scan time
    pub fn is_complete(&self, stage: &Stage) -> bool {
        self.exists(stage.completion)
    }
}
