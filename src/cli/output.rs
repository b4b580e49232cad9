//! CLI output formatting

use crate::core::RunReport;
use crate::execution::PipelineEvent;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SKIP: Emoji<'_, '_> = Emoji("⏭️  ", "- ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Timestamp prefix used on every console message
fn timestamp() -> String {
    chrono::Local::now().format("%c").to_string()
}

/// Create a progress bar spanning the stage list
pub fn create_progress_bar(total: usize) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

/// Format a pipeline event for display
pub fn format_event(event: &PipelineEvent) -> String {
    match event {
        PipelineEvent::PipelineStarted { run_id, total_stages } => format!(
            "{}: {} Starting scaffolding ({} stages, run {})",
            timestamp(),
            ROCKET,
            total_stages,
            style(&run_id.to_string()[..8]).dim()
        ),
        PipelineEvent::StageStarted { label, .. } => {
            format!("{}: {}", timestamp(), label)
        }
        PipelineEvent::StageSkipped { stage, artifact } => format!(
            "{}: {} {} ({} already exists)",
            timestamp(),
            SKIP,
            style(stage).dim(),
            artifact
        ),
        PipelineEvent::StageCompleted { stage } => {
            format!("{}: {} {}", timestamp(), CHECK, style(stage).green())
        }
        PipelineEvent::StageFailed { stage, fatal, error } => {
            if *fatal {
                format!(
                    "{}: {} {}: {}",
                    timestamp(),
                    CROSS,
                    style(stage).red(),
                    style(error).dim()
                )
            } else {
                format!(
                    "{}: {} {}: {}",
                    timestamp(),
                    WARN,
                    style(stage).yellow(),
                    style(error).dim()
                )
            }
        }
        PipelineEvent::PipelineCompleted { warnings, .. } => {
            if *warnings == 0 {
                format!(
                    "{}: {} Scaffolding {}",
                    timestamp(),
                    CHECK,
                    style("finished").green()
                )
            } else {
                format!(
                    "{}: {} Scaffolding finished with {} warning(s)",
                    timestamp(),
                    WARN,
                    style(warnings).yellow()
                )
            }
        }
    }
}

/// Format the end-of-run summary line
pub fn format_summary(report: &RunReport) -> String {
    format!(
        "{} stages executed, {} skipped, {} warnings",
        style(report.executed()).cyan(),
        style(report.skipped()).dim(),
        if report.warnings() == 0 {
            style(report.warnings()).green()
        } else {
            style(report.warnings()).yellow()
        }
    )
}
