//! The stage graph
//!
//! The pipeline is a fixed, hard-ordered sequence of stages with two
//! conditional branches: repeat detection (on by default) and visualization
//! export (off by default). Every command is fully parameterized here, at
//! build time, from the run configuration; nothing about a stage is derived
//! during execution.

use std::ffi::OsString;
use std::path::Path;

use crate::core::artifact::Artifact;
use crate::core::config::RunConfig;
use crate::core::stage::{FailurePolicy, Stage, StageAction};
use crate::invoke::CommandSpec;

/// Build the ordered stage list for one run
pub fn build_stages(config: &RunConfig) -> Vec<Stage> {
    let dir = &config.working_dir;
    let mut stages = Vec::new();

    stages.push(Stage {
        id: "alignment-conversion",
        label: "Converting bam file to bed file",
        completion: Artifact::AlignmentBed,
        outputs: vec![Artifact::AlignmentBed],
        action: StageAction::Invoke(vec![CommandSpec::new("bamToBed")
            .arg("-i")
            .arg(&config.mapping)
            .stdout_to(Artifact::AlignmentBed.path(dir))]),
        policy: FailurePolicy::Abort,
    });

    stages.push(Stage {
        id: "contig-lengths",
        label: "Extracting contig lengths from the assembly index",
        completion: Artifact::ContigLength,
        outputs: vec![Artifact::ContigLength],
        action: StageAction::Invoke(vec![
            CommandSpec::new("samtools").arg("faidx").arg(&config.assembly),
            CommandSpec::new("cut")
                .args(["-f", "1,2"])
                .arg(fai_path(&config.assembly))
                .stdout_to(Artifact::ContigLength.path(dir)),
        ]),
        policy: FailurePolicy::Abort,
    });

    stages.push(Stage {
        id: "link-generation",
        label: "Generating links between contigs",
        completion: Artifact::ContigLinks,
        outputs: vec![Artifact::ContigLinks, Artifact::ContigCoverage],
        action: StageAction::Invoke(vec![CommandSpec::new(config.tool("libcorrect"))
            .arg("-a")
            .arg(Artifact::AlignmentBed.path(dir))
            .arg("-d")
            .arg(Artifact::ContigLength.path(dir))
            .arg("-o")
            .arg(Artifact::ContigLinks.path(dir))
            .arg("-x")
            .arg(Artifact::ContigCoverage.path(dir))
            .arg("-c")
            .arg(config.min_contig_length.to_string())]),
        policy: FailurePolicy::Abort,
    });

    stages.push(Stage {
        id: "link-bundling",
        label: "Bundling links between contigs",
        completion: Artifact::BundledLinks,
        outputs: vec![Artifact::BundledLinks, Artifact::BundledGraph],
        action: StageAction::Invoke(vec![CommandSpec::new(config.tool("bundler"))
            .arg("-l")
            .arg(Artifact::ContigLinks.path(dir))
            .arg("-o")
            .arg(Artifact::BundledLinks.path(dir))
            .arg("-b")
            .arg(Artifact::BundledGraph.path(dir))
            .arg("-c")
            .arg(config.min_mate_support.to_string())]),
        policy: FailurePolicy::Abort,
    });

    if config.repeats {
        // Preliminary orientation pass over the unfiltered links; the repeat
        // filter only consumes its invalidated-edge counts.
        stages.push(Stage {
            id: "repeat-orientation",
            label: "Counting invalidated edges for repeat detection",
            completion: Artifact::InvalidatedCounts,
            outputs: vec![
                Artifact::OrientedGraph,
                Artifact::OrientedLinks,
                Artifact::InvalidatedCounts,
            ],
            action: StageAction::Invoke(vec![orientcontigs(
                config,
                Artifact::BundledLinks.path(dir),
            )]),
            policy: FailurePolicy::WarnAndContinue,
        });

        stages.push(Stage {
            id: "centrality",
            label: "Computing betweenness centrality",
            completion: Artifact::HighCentrality,
            outputs: vec![Artifact::HighCentrality],
            action: StageAction::Invoke(vec![CommandSpec::new("python3")
                .arg(config.tool("centrality.py"))
                .arg("-g")
                .arg(Artifact::BundledLinks.path(dir))
                .arg("-l")
                .arg(Artifact::ContigLength.path(dir))
                .arg("-o")
                .arg(Artifact::HighCentrality.path(dir))]),
            policy: FailurePolicy::Abort,
        });

        stages.push(Stage {
            id: "repeat-filtering",
            label: "Filtering repeat contigs from the bundled links",
            completion: Artifact::FilteredLinks,
            outputs: vec![Artifact::FilteredLinks, Artifact::Repeats],
            action: StageAction::Invoke(vec![CommandSpec::new("python3")
                .arg(config.tool("repeat_filter.py"))
                .arg(Artifact::ContigCoverage.path(dir))
                .arg(Artifact::BundledLinks.path(dir))
                .arg(Artifact::InvalidatedCounts.path(dir))
                .arg(Artifact::HighCentrality.path(dir))
                .arg(Artifact::ContigLength.path(dir))
                .arg(Artifact::Repeats.path(dir))
                .stdout_to(Artifact::FilteredLinks.path(dir))]),
            policy: FailurePolicy::Abort,
        });
    } else {
        // With repeat detection off, the unfiltered bundle is carried
        // forward unchanged as the filtered link set.
        stages.push(Stage {
            id: "link-promotion",
            label: "Carrying bundled links forward unfiltered",
            completion: Artifact::FilteredLinks,
            outputs: vec![Artifact::FilteredLinks],
            action: StageAction::Carry {
                from: Artifact::BundledLinks,
                to: Artifact::FilteredLinks,
            },
            policy: FailurePolicy::Abort,
        });
    }

    stages.push(Stage {
        id: "orientation",
        label: "Orienting the contigs",
        completion: Artifact::OrientedLinks,
        outputs: vec![
            Artifact::OrientedGraph,
            Artifact::OrientedLinks,
            Artifact::InvalidatedCounts,
        ],
        action: StageAction::Invoke(vec![orientcontigs(
            config,
            Artifact::FilteredLinks.path(dir),
        )]),
        policy: FailurePolicy::WarnAndContinue,
    });

    stages.push(Stage {
        id: "separation-pairs",
        label: "Finding separation pairs",
        completion: Artifact::SepPairs,
        outputs: vec![Artifact::SepPairs, Artifact::Bubbles],
        action: StageAction::Invoke(vec![CommandSpec::new(config.tool("spqr"))
            .arg("-l")
            .arg(Artifact::OrientedLinks.path(dir))
            .arg("-o")
            .arg(Artifact::SepPairs.path(dir))]),
        policy: FailurePolicy::Abort,
    });

    stages.push(Stage {
        id: "layout",
        label: "Computing the layout of contigs",
        completion: Artifact::ScaffoldFasta,
        outputs: vec![
            Artifact::ScaffoldFasta,
            Artifact::ScaffoldAgp,
            Artifact::ScaffoldGraph,
        ],
        action: StageAction::Invoke(vec![CommandSpec::new("python3")
            .arg(config.tool("layout.py"))
            .arg("-a")
            .arg(&config.assembly)
            .arg("-b")
            .arg(Artifact::Bubbles.path(dir))
            .arg("-g")
            .arg(Artifact::OrientedGraph.path(dir))
            .arg("-s")
            .arg(Artifact::SepPairs.path(dir))
            .arg("-o")
            .arg(Artifact::ScaffoldFasta.path(dir))
            .arg("-f")
            .arg(Artifact::ScaffoldAgp.path(dir))
            .arg("-e")
            .arg(Artifact::ScaffoldGraph.path(dir))]),
        policy: FailurePolicy::WarnAndContinue,
    });

    if config.visualization {
        stages.push(Stage {
            id: "visualization",
            label: "Exporting the visualization database",
            completion: Artifact::VisualizationDb,
            outputs: vec![Artifact::VisualizationDb],
            action: StageAction::Invoke(vec![CommandSpec::new("python3")
                .arg(config.tool("MetagenomeScope/graph_collator/collate.py"))
                .arg("-i")
                .arg(Artifact::OrientedGraph.path(dir))
                .arg("-w")
                .arg("-ub")
                .arg(Artifact::Bubbles.path(dir))
                .arg("-ubl")
                .arg("-d")
                .arg(dir)
                .arg("-o")
                .arg("mgsc")]),
            policy: FailurePolicy::WarnAndContinue,
        });
    }

    stages
}

/// Both orientation passes run the same program; only the link input differs.
fn orientcontigs(config: &RunConfig, links: impl Into<OsString>) -> CommandSpec {
    let dir = &config.working_dir;
    CommandSpec::new(config.tool("orientcontigs"))
        .arg("-l")
        .arg(links)
        .arg("-c")
        .arg(Artifact::ContigLength.path(dir))
        .arg("--bsize")
        .arg("-o")
        .arg(Artifact::OrientedGraph.path(dir))
        .arg("-p")
        .arg(Artifact::OrientedLinks.path(dir))
        .arg("-i")
        .arg(Artifact::InvalidatedCounts.path(dir))
}

fn fai_path(assembly: &Path) -> OsString {
    let mut fai = assembly.as_os_str().to_os_string();
    fai.push(".fai");
    fai
}
