//! Test: failure propagation and artifact hygiene

use crate::helpers::*;
use metacarvel::core::Artifact;
use metacarvel::execution::PipelineError;

/// A failing conversion stage aborts the run before anything downstream
#[tokio::test]
async fn test_conversion_failure_aborts_with_no_downstream_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let executor = FakeExecutor::succeeding(dir.path())
        .with_behavior("bamToBed", StageBehavior::failure(1));
    let (result, log) = run_pipeline(&config, executor).await;

    let err = result.unwrap_err();
    assert!(matches!(err, PipelineError::Stage(_)));
    assert!(err.to_string().contains("alignment-conversion"));

    assert_eq!(invoked_programs(&log), vec!["bamToBed".to_string()]);
    for artifact in [
        Artifact::AlignmentBed,
        Artifact::ContigLinks,
        Artifact::BundledLinks,
        Artifact::ScaffoldFasta,
    ] {
        assert!(
            !artifact.path(dir.path()).exists(),
            "{artifact} should not exist after an aborted run"
        );
    }
}

/// A failed stage never leaves its partial output behind
#[tokio::test]
async fn test_failed_stage_output_is_removed() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    // The filter writes its stdout capture before dying; the partial file
    // must not survive to be mistaken for a completed stage on retry.
    let executor = FakeExecutor::succeeding(dir.path())
        .with_behavior("repeat_filter.py", StageBehavior::failure(1));
    let (result, _) = run_pipeline(&config, executor).await;

    result.unwrap_err();
    assert!(!Artifact::FilteredLinks.path(dir.path()).exists());
    assert!(!Artifact::Repeats.path(dir.path()).exists());
}

/// An orientation failure is reported but the pipeline proceeds
#[tokio::test]
async fn test_orientation_failure_is_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let executor = FakeExecutor::succeeding(dir.path())
        .with_behavior("orientcontigs", StageBehavior::failure(1));
    let (result, log) = run_pipeline(&config, executor).await;

    let report = result.unwrap();
    assert_eq!(report.warnings(), 2);
    assert!(!report.is_clean());

    // Both the decomposition and the layout still ran afterwards.
    let programs = invoked_programs(&log);
    assert!(programs.iter().any(|p| p == "spqr"));
    assert!(programs.iter().any(|p| p == "layout.py"));
}

/// A layout failure is reported but the run still finishes cleanly enough
/// to exit zero
#[tokio::test]
async fn test_layout_failure_does_not_abort() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let executor = FakeExecutor::succeeding(dir.path())
        .with_behavior("layout.py", StageBehavior::failure(1));
    let (result, _) = run_pipeline(&config, executor).await;

    let report = result.unwrap();
    assert_eq!(report.warnings(), 1);
    assert!(!Artifact::ScaffoldFasta.path(dir.path()).exists());
}

/// A centrality failure inside the repeat branch is fatal
#[tokio::test]
async fn test_centrality_failure_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let executor = FakeExecutor::succeeding(dir.path())
        .with_behavior("centrality.py", StageBehavior::failure(2));
    let (result, log) = run_pipeline(&config, executor).await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("exit code 2"));

    let programs = invoked_programs(&log);
    assert!(!programs.iter().any(|p| p == "repeat_filter.py"));
    assert!(!programs.iter().any(|p| p == "spqr"));
}

/// Failure diagnostics carry the rendered command for re-running by hand
#[tokio::test]
async fn test_failure_diagnostics_include_the_command() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let executor = FakeExecutor::succeeding(dir.path())
        .with_behavior("bundler", StageBehavior::failure(1));
    let (result, _) = run_pipeline(&config, executor).await;

    let message = result.unwrap_err().to_string();
    assert!(message.contains("bundler"));
    assert!(message.contains("-c 3"));
    assert!(message.contains("simulated stage failure"));
}
