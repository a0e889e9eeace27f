//! Command implementations for the Rankfuse CLI.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use anyhow::Context;
use log::{debug, info};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::Result;
use crate::fusion::config::FusionConfig;
use crate::fusion::engine::RankFusionEngine;
use crate::fusion::types::RankedList;
use crate::sparse::extractor::{ExtractorConfig, SparseVectorExtractor};
use crate::sparse::tensor::{ImportanceTensor, ValidityMask};
use crate::sparse::vector::SparseVector;
use crate::sparse::vocab::Vocabulary;

/// Input document of the `extract` command.
#[derive(Debug, Deserialize)]
pub struct TensorInput {
    pub tensor: Vec<Vec<f32>>,
    pub mask: Option<Vec<u32>>,
}

/// Execute a CLI command.
pub fn execute_command(args: RankfuseArgs) -> Result<()> {
    match &args.command {
        Command::Extract(extract_args) => extract_vector(extract_args.clone(), &args),
        Command::Fuse(fuse_args) => fuse_lists(fuse_args.clone(), &args),
        Command::Decode(decode_args) => decode_vector(decode_args.clone(), &args),
    }
}

/// Read and parse a JSON document from a file, or stdin for `-`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        return Ok(serde_json::from_str(&content)?);
    }

    let file =
        File::open(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Build the extraction result for a parsed input document.
pub fn run_extract(input: TensorInput, args: &ExtractArgs) -> Result<ExtractionResult> {
    let mut config = match &args.config {
        Some(path) => ExtractorConfig::from_json_file(path)?,
        None => ExtractorConfig::default(),
    };
    if let Some(threshold) = args.threshold {
        config = config.with_threshold(threshold);
    }
    let extractor = SparseVectorExtractor::new(config)?;

    let tensor = if args.logits {
        ImportanceTensor::from_logit_rows(input.tensor)?
    } else {
        ImportanceTensor::from_rows(input.tensor)?
    };
    let mask = input
        .mask
        .map(ValidityMask::from)
        .unwrap_or_else(|| ValidityMask::all_valid(tensor.rows()));

    let vector = extractor.extract(&tensor, &mask)?;

    let terms = match &args.vocab {
        Some(path) => Some(Vocabulary::from_json_file(path)?.decode(&vector)),
        None => None,
    };

    Ok(ExtractionResult {
        tokens: tensor.rows(),
        valid_tokens: mask.valid_count(),
        dimensions: tensor.cols(),
        non_zero: vector.len(),
        vector,
        terms,
    })
}

/// Build the fusion result for already loaded ranked lists.
pub fn run_fuse(lists: Vec<RankedList>, args: &FuseArgs) -> Result<FusionResult> {
    let mut config = match &args.config {
        Some(path) => FusionConfig::from_json_file(path)?,
        None => FusionConfig::default(),
    };
    if let Some(k) = args.k {
        config = config.with_k(k);
    }
    if let Some(weights) = &args.weights {
        config = config.with_weights(weights.clone());
    }

    let engine = RankFusionEngine::new(config)?;
    let mut results = engine.fuse(&lists)?;
    let total_results = results.len();
    if let Some(top_n) = args.top_n {
        results.truncate(top_n);
    }

    Ok(FusionResult {
        lists: lists.len(),
        k: engine.config().k,
        total_results,
        results,
    })
}

/// Build the decode result for a parsed sparse vector.
pub fn run_decode(vector: SparseVector, vocab: &Vocabulary, top_n: Option<usize>) -> DecodeResult {
    let mut terms = vocab.decode(&vector);
    if let Some(top_n) = top_n {
        terms.truncate(top_n);
    }
    DecodeResult {
        non_zero: vector.len(),
        terms,
    }
}

/// Pool an importance tensor into a sparse vector.
fn extract_vector(args: ExtractArgs, cli_args: &RankfuseArgs) -> Result<()> {
    info!("Extracting sparse vector from: {}", args.input.display());

    let input: TensorInput = read_json(&args.input)?;
    let result = run_extract(input, &args)?;

    output_result("Sparse vector extracted", &result, cli_args)
}

/// Fuse ranked lists.
fn fuse_lists(args: FuseArgs, cli_args: &RankfuseArgs) -> Result<()> {
    let mut lists = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        let list: RankedList = read_json(path)?;
        debug!("Loaded {} ranked items from {}", list.len(), path.display());
        lists.push(list);
    }
    info!("Fusing {} ranked lists", lists.len());

    let result = run_fuse(lists, &args)?;

    output_result("Ranked lists fused", &result, cli_args)
}

/// Decode a sparse vector into vocabulary terms.
fn decode_vector(args: DecodeArgs, cli_args: &RankfuseArgs) -> Result<()> {
    let vector: SparseVector = read_json(&args.input)?;
    let vocab = Vocabulary::from_json_file(&args.vocab)?;
    info!("Loaded vocabulary of {} tokens", vocab.len());

    let result = run_decode(vector, &vocab, args.top_n);

    output_result("Sparse vector decoded", &result, cli_args)
}
