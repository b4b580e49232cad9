//! Test: skip and resume behavior driven by the artifact ledger

use crate::helpers::*;
use metacarvel::core::Artifact;
use pretty_assertions::assert_eq;

/// A second run over an untouched working directory invokes nothing
#[tokio::test]
async fn test_second_run_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let (first, _) = run_pipeline(&config, FakeExecutor::succeeding(dir.path())).await;
    let first = first.unwrap();
    assert!(first.is_clean());
    assert_eq!(first.skipped(), 0);

    let (second, log) = run_pipeline(&config, FakeExecutor::succeeding(dir.path())).await;
    let second = second.unwrap();

    assert_eq!(invoked_programs(&log), Vec::<String>::new());
    assert_eq!(second.skipped(), first.executed());
    assert_eq!(second.executed(), 0);
}

/// Pre-created artifacts skip exactly their stages; the run resumes at the
/// first stage whose output is missing
#[tokio::test]
async fn test_resume_skips_prefix_of_completed_stages() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    for artifact in [
        Artifact::AlignmentBed,
        Artifact::ContigLength,
        Artifact::ContigLinks,
        Artifact::BundledLinks,
    ] {
        std::fs::write(artifact.path(dir.path()), "from an earlier run\n").unwrap();
    }

    let (result, log) = run_pipeline(&config, FakeExecutor::succeeding(dir.path())).await;
    let report = result.unwrap();

    assert_eq!(report.skipped(), 4);
    let programs = invoked_programs(&log);
    assert_eq!(programs.first().map(String::as_str), Some("orientcontigs"));
    for never_run in ["bamToBed", "samtools", "cut", "libcorrect", "bundler"] {
        assert!(
            !programs.iter().any(|p| p == never_run),
            "{never_run} should have been skipped"
        );
    }
}

/// Deleting a single intermediate re-runs only the stage that produces it
#[tokio::test]
async fn test_single_missing_artifact_reruns_one_stage() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let (first, _) = run_pipeline(&config, FakeExecutor::succeeding(dir.path())).await;
    first.unwrap();

    std::fs::remove_file(Artifact::BundledLinks.path(dir.path())).unwrap();

    let (second, log) = run_pipeline(&config, FakeExecutor::succeeding(dir.path())).await;
    let report = second.unwrap();

    assert_eq!(invoked_programs(&log), vec!["bundler".to_string()]);
    assert_eq!(report.executed(), 1);
}

/// Skip decisions come from the directory state at startup, not from files
/// written while the run is in flight: the preliminary orientation pass
/// writes the same paths as the final one, yet both run
#[tokio::test]
async fn test_both_orientation_passes_run_on_a_fresh_directory() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let (result, log) = run_pipeline(&config, FakeExecutor::succeeding(dir.path())).await;
    result.unwrap();

    let orientation_runs = invoked_programs(&log)
        .iter()
        .filter(|p| *p == "orientcontigs")
        .count();
    assert_eq!(orientation_runs, 2);

    let commands = invoked_commands(&log);
    let final_pass = commands
        .iter()
        .filter(|c| c.contains("orientcontigs"))
        .next_back()
        .unwrap()
        .clone();
    assert!(final_pass.contains("bundled_links_filtered"));
}
