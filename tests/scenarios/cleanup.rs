//! Test: end-of-run reclamation of intermediates

use crate::helpers::*;
use metacarvel::core::Artifact;
use metacarvel::execution::reclaim;

const INTERMEDIATE_NAMES: [&str; 12] = [
    "contig_length",
    "contig_links",
    "contig_coverage",
    "bundled_links",
    "bundled_links_filtered",
    "bundled_graph.gml",
    "invalidated_counts",
    "repeats",
    "oriented_links",
    "oriented.gml",
    "seppairs",
    "alignment.bed",
];

/// After a full run with reclamation, exactly the enumerated intermediates
/// are gone and every final deliverable remains
#[tokio::test]
async fn test_reclamation_is_complete_and_selective() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let (result, _) = run_pipeline(&config, FakeExecutor::succeeding(dir.path())).await;
    result.unwrap();

    reclaim(dir.path(), false).await.unwrap();

    for name in INTERMEDIATE_NAMES {
        assert!(
            !dir.path().join(name).exists(),
            "{name} should have been reclaimed"
        );
    }
    for artifact in [
        Artifact::ScaffoldFasta,
        Artifact::ScaffoldAgp,
        Artifact::ScaffoldGraph,
    ] {
        assert!(
            artifact.path(dir.path()).exists(),
            "{artifact} is a final deliverable"
        );
    }
}

/// The keep flag leaves every artifact in place
#[tokio::test]
async fn test_keep_flag_retains_intermediates() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let (result, _) = run_pipeline(&config, FakeExecutor::succeeding(dir.path())).await;
    result.unwrap();

    reclaim(dir.path(), true).await.unwrap();

    for name in INTERMEDIATE_NAMES {
        assert!(dir.path().join(name).exists(), "{name} should have been kept");
    }
    assert!(Artifact::ScaffoldFasta.path(dir.path()).exists());
}

/// Reclamation after a reclaimed run finds nothing left to delete
#[tokio::test]
async fn test_reclamation_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let (result, _) = run_pipeline(&config, FakeExecutor::succeeding(dir.path())).await;
    result.unwrap();

    let first = reclaim(dir.path(), false).await.unwrap();
    assert!(first > 0);
    let second = reclaim(dir.path(), false).await.unwrap();
    assert_eq!(second, 0);
}

/// The visualization database survives reclamation alongside the scaffolds
#[tokio::test]
async fn test_visualization_database_is_never_reclaimed() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.visualization = true;

    let (result, _) = run_pipeline(&config, FakeExecutor::succeeding(dir.path())).await;
    result.unwrap();

    reclaim(dir.path(), false).await.unwrap();
    assert!(Artifact::VisualizationDb.path(dir.path()).exists());
}
