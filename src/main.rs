// src/main.rs
// ============================================================================
// FINETUNE-AUDIT CLI
// ============================================================================
//
// Uso:
//   finetune-audit dataset.jsonl
//   finetune-audit dataset.jsonl --pretty -v
//
// Prints one JSON report to stdout; logging goes to stderr so the report
// stays machine-readable.
//
// ============================================================================

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use finetune_audit::{audit_dataset, Cl100kTokenizer};

#[derive(Parser, Debug)]
#[command(name = "finetune-audit")]
#[command(about = "Validate a chat fine-tuning JSONL dataset and report token statistics")]
#[command(version = "0.1.0")]
struct Args {
    /// JSONL dataset file (one training example per line)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let tokenizer = Cl100kTokenizer::new().context("failed to load cl100k_base tokenizer")?;

    let report = audit_dataset(&args.file, &tokenizer)?;

    println!("{}", report.to_json(args.pretty)?);

    Ok(())
}
