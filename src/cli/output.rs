//! Output formatting for CLI commands.

use std::io::{self, Write};

use serde::Serialize;

use crate::cli::args::{OutputFormat, RankfuseArgs};
use crate::error::Result;
use crate::fusion::types::FusedResult;
use crate::sparse::vector::SparseVector;
use crate::sparse::vocab::TermWeight;

/// Result structure for sparse vector extraction.
#[derive(Debug, Serialize)]
pub struct ExtractionResult {
    pub tokens: usize,
    pub valid_tokens: usize,
    pub dimensions: usize,
    pub non_zero: usize,
    pub vector: SparseVector,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms: Option<Vec<TermWeight>>,
}

/// Result structure for rank fusion.
#[derive(Debug, Serialize)]
pub struct FusionResult {
    pub lists: usize,
    pub k: f64,
    pub total_results: usize,
    pub results: Vec<FusedResult>,
}

/// Result structure for sparse vector decoding.
#[derive(Debug, Serialize)]
pub struct DecodeResult {
    pub non_zero: usize,
    pub terms: Vec<TermWeight>,
}

/// Human-readable rendering of a command result.
pub trait HumanOutput {
    fn write_human<W: Write>(&self, out: &mut W) -> io::Result<()>;
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &RankfuseArgs,
) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_result(&mut out, message, result, args)
}

/// Write a result to `out` in the format selected by `args`.
pub fn write_result<W: Write, T: Serialize + HumanOutput>(
    out: &mut W,
    message: &str,
    result: &T,
    args: &RankfuseArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => write_human(out, message, result, args),
        OutputFormat::Json => write_json(out, result, args),
    }
}

/// Write in human-readable format.
fn write_human<W: Write, T: HumanOutput>(
    out: &mut W,
    message: &str,
    result: &T,
    args: &RankfuseArgs,
) -> Result<()> {
    if args.verbosity() > 1 {
        writeln!(out, "{message}")?;
        writeln!(out)?;
    }
    result.write_human(out)?;
    Ok(())
}

/// Write in JSON format.
fn write_json<W: Write, T: Serialize>(out: &mut W, result: &T, args: &RankfuseArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    writeln!(out, "{json}")?;
    Ok(())
}

fn write_terms<W: Write>(out: &mut W, terms: &[TermWeight]) -> io::Result<()> {
    for term in terms {
        writeln!(out, "  {:<24} {:>6}  {:.4}", term.token, term.id, term.weight)?;
    }
    Ok(())
}

impl HumanOutput for ExtractionResult {
    fn write_human<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Sparse Vector:")?;
        writeln!(out, "══════════════")?;
        writeln!(
            out,
            "Tokens: {} ({} valid), dimensions: {}, non-zero: {}",
            self.tokens, self.valid_tokens, self.dimensions, self.non_zero
        )?;
        writeln!(out, "indices: {:?}", self.vector.indices())?;
        writeln!(out, "values:  {:?}", self.vector.values())?;

        if let Some(terms) = &self.terms {
            writeln!(out)?;
            writeln!(out, "Terms:")?;
            writeln!(out, "──────")?;
            write_terms(out, terms)?;
        }
        Ok(())
    }
}

impl HumanOutput for FusionResult {
    fn write_human<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Fused Results (reciprocal rank fusion, k = {}):", self.k)?;
        writeln!(out, "═══════════════════════════════════════════════")?;

        for (i, result) in self.results.iter().enumerate() {
            let ranks: Vec<String> = result
                .ranks
                .iter()
                .map(|rank| rank.map_or_else(|| "-".to_string(), |r| (r + 1).to_string()))
                .collect();
            writeln!(
                out,
                "{:>4}. id: {:<12} score: {:.6}  ranks: [{}]",
                i + 1,
                result.id.to_string(),
                result.fusion_score,
                ranks.join(", ")
            )?;
        }

        writeln!(out)?;
        writeln!(
            out,
            "Shown: {} of {} fused results from {} lists",
            self.results.len(),
            self.total_results,
            self.lists
        )?;
        Ok(())
    }
}

impl HumanOutput for DecodeResult {
    fn write_human<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Terms ({} non-zero):", self.non_zero)?;
        writeln!(out, "═══════════════════")?;
        write_terms(out, &self.terms)
    }
}
