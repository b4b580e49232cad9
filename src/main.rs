mod cli;
mod core;
mod execution;
mod invoke;
mod preflight;

use anyhow::{Context, Result};
use cli::output::{self, style, CHECK};
use cli::Cli;
use crate::core::{build_stages, RunConfig, RunReport};
use execution::PipelineEngine;
use invoke::SystemExecutor;
use tracing::{debug, error, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    match scaffold(&cli).await {
        Ok(report) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{} {}", CHECK, output::format_summary(&report));
            }
            Ok(())
        }
        Err(err) => {
            error!("{:#}", err);
            eprintln!(
                "{} {}",
                output::CROSS,
                style(format!("{:#}", err)).red()
            );
            std::process::exit(1);
        }
    }
}

/// Run the whole scaffolding pipeline for one configuration
async fn scaffold(cli: &Cli) -> Result<RunReport> {
    let config = RunConfig::from_cli(cli)?;
    debug!("Run configuration: {}", serde_json::to_string(&config)?);

    // Dependency absence is fatal before any stage runs.
    preflight::check_dependencies().await?;

    tokio::fs::create_dir_all(&config.working_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create output directory {}",
                config.working_dir.display()
            )
        })?;

    let stages = build_stages(&config);
    let mut engine = PipelineEngine::new(SystemExecutor::new(), config.working_dir.clone());

    // Console rendering happens through the event stream; the progress bar
    // spans the stage list and messages print above it.
    if !cli.json {
        let progress = output::create_progress_bar(stages.len());
        engine.add_event_handler(move |event| {
            progress.println(output::format_event(event));
            match event {
                execution::PipelineEvent::StageFailed { fatal: true, .. } => {
                    progress.finish_and_clear();
                }
                execution::PipelineEvent::StageCompleted { .. }
                | execution::PipelineEvent::StageSkipped { .. }
                | execution::PipelineEvent::StageFailed { .. } => progress.inc(1),
                execution::PipelineEvent::PipelineCompleted { .. } => progress.finish_and_clear(),
                _ => {}
            }
        });
    }

    let report = engine.run(&stages).await?;

    execution::reclaim(&config.working_dir, config.keep_temps)
        .await
        .context("Failed to reclaim temporary files")?;

    Ok(report)
}
