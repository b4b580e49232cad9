//! End-of-run reclamation of intermediate artifacts

use std::io;
use std::path::Path;
use tracing::{debug, info};

use crate::core::Artifact;

/// Delete the intermediate artifacts from the working directory
///
/// Runs only after a pipeline that reached its end; final deliverables are
/// never touched. With `keep` set, nothing is deleted. Returns how many
/// files were removed; a missing intermediate is not an error.
pub async fn reclaim(working_dir: &Path, keep: bool) -> io::Result<usize> {
    if keep {
        debug!("Keeping temporary files in {}", working_dir.display());
        return Ok(0);
    }

    let mut removed = 0;
    for artifact in Artifact::INTERMEDIATES {
        let path = artifact.path(working_dir);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Reclaimed {}", path.display());
                removed += 1;
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err),
        }
    }

    info!("Reclaimed {} temporary files", removed);
    Ok(removed)
}
