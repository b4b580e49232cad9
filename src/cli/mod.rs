//! Command-line interface

pub mod output;

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// MetaCarvel: a scaffolding tool for metagenomic assemblies
#[derive(Debug, Parser, Clone)]
#[command(name = "metacarvel")]
#[command(version = "0.1.0")]
#[command(about = "A scaffolding tool for metagenomic assemblies", long_about = None)]
pub struct Cli {
    /// Assembled contigs
    #[arg(short, long)]
    pub assembly: PathBuf,

    /// Mapping of reads to contigs in bam format
    #[arg(short, long)]
    pub mapping: PathBuf,

    /// Output directory for results
    #[arg(short, long)]
    pub dir: PathBuf,

    /// Turn repeat detection on or off
    #[arg(short, long, default_value_t = true, action = clap::ArgAction::Set)]
    pub repeats: bool,

    /// Keep temporary files in the output directory
    #[arg(short, long)]
    pub keep: bool,

    /// Minimum length of contigs to consider for scaffolding in base pairs (bp)
    #[arg(short, long, default_value_t = 500)]
    pub length: u64,

    /// Minimum mate pair support between contigs to consider for scaffolding
    #[arg(short, long, default_value_t = 3)]
    pub bsize: u64,

    /// Generate a .db file for the MetagenomeScope visualization tool
    #[arg(short, long)]
    pub visualization: bool,

    /// Directory holding the stage programs (defaults to the executable's directory)
    #[arg(long)]
    pub tools: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,

    /// Print a machine-readable run summary on stdout
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Parse CLI arguments from the environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
