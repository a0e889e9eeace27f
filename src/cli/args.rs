//! Command line argument parsing for the Rankfuse CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Rankfuse - sparse vector extraction and reciprocal rank fusion
#[derive(Parser, Debug, Clone)]
#[command(name = "rankfuse")]
#[command(about = "Sparse vector extraction and reciprocal rank fusion for hybrid retrieval")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct RankfuseArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl RankfuseArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Pool an importance tensor into a sparse vector
    Extract(ExtractArgs),

    /// Fuse ranked lists with reciprocal rank fusion
    Fuse(FuseArgs),

    /// Show the vocabulary terms of a sparse vector
    Decode(DecodeArgs),
}

/// Arguments for sparse vector extraction
#[derive(Parser, Debug, Clone)]
pub struct ExtractArgs {
    /// JSON file `{"tensor": [[..]], "mask": [..]}` ("-" for stdin)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Treat the tensor as raw logits and apply log(1 + relu(x)) first
    #[arg(long)]
    pub logits: bool,

    /// Keep dimensions whose pooled value exceeds this
    #[arg(long, value_name = "THRESHOLD")]
    pub threshold: Option<f32>,

    /// Extractor configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Vocabulary file (JSON token -> id) for decoding the result
    #[arg(long, value_name = "VOCAB_FILE")]
    pub vocab: Option<PathBuf>,
}

/// Arguments for rank fusion
#[derive(Parser, Debug, Clone)]
pub struct FuseArgs {
    /// JSON files, each an array of {"id": .., "score": ..} in rank order
    #[arg(value_name = "INPUT", required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// RRF damping constant
    #[arg(short, long)]
    pub k: Option<f64>,

    /// Per-list weights, comma separated, one per input
    #[arg(short, long, value_delimiter = ',')]
    pub weights: Option<Vec<f64>>,

    /// Only print the first N fused results
    #[arg(short = 'n', long = "top-n", value_name = "N")]
    pub top_n: Option<usize>,

    /// Fusion configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments for sparse vector decoding
#[derive(Parser, Debug, Clone)]
pub struct DecodeArgs {
    /// JSON sparse vector `{"indices": [..], "values": [..]}` ("-" for stdin)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Vocabulary file (JSON token -> id)
    #[arg(long, value_name = "VOCAB_FILE")]
    pub vocab: PathBuf,

    /// Only print the N heaviest terms
    #[arg(short = 'n', long = "top-n", value_name = "N")]
    pub top_n: Option<usize>,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
