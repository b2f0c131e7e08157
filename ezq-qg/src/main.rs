//! ezq-qg - Quiz authoring command line
//!
//! Thin caller over the authoring library: normalizes raw quiz input from a
//! file or stdin, checks hand-typed lines with full per-line diagnostics, or
//! runs batched generation with the configured provider.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ezq_common::QuestionKind;
use ezq_qg::config::GenerationConfig;
use ezq_qg::normalizer::{normalize_text, to_legacy_lines, NormalizeOptions};
use ezq_qg::parser::parse_strict;
use ezq_qg::services::{generate_in_batches, resolve_provider, BatchRequest};

#[derive(Parser)]
#[command(name = "ezq-qg", version, about = "Quiz authoring and generation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize raw quiz input (legacy lines or JSON) into canonical form.
    Normalize {
        /// Input file; reads stdin when omitted.
        file: Option<PathBuf>,
        /// Topic recorded on the quiz when the input does not carry one.
        #[arg(long, default_value = "")]
        topic: String,
        /// Keep at most this many questions.
        #[arg(long)]
        count: Option<usize>,
        /// Restrict to these question types (MC, TF, YN, MT).
        #[arg(long, value_delimiter = ',')]
        types: Vec<QuestionKind>,
        /// Print the canonical quiz as JSON instead of legacy lines.
        #[arg(long)]
        json: bool,
    },
    /// Check hand-typed legacy lines, reporting every bad line.
    Check {
        /// Input file; reads stdin when omitted.
        file: Option<PathBuf>,
    },
    /// Generate quiz lines with the configured provider.
    Generate {
        #[arg(long, default_value = "General knowledge")]
        topic: String,
        #[arg(long, default_value_t = 10)]
        count: usize,
        /// Restrict to these question types (MC, TF, YN, MT).
        #[arg(long, value_delimiter = ',')]
        types: Vec<QuestionKind>,
        #[arg(long)]
        difficulty: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Normalize {
            file,
            topic,
            count,
            types,
            json,
        } => {
            let input = read_input(file.as_deref())?;
            let opts = NormalizeOptions {
                topic,
                count,
                kinds: kinds_option(types),
            };
            let quiz = normalize_text(&input, &opts)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&quiz)?);
            } else {
                let legacy = to_legacy_lines(&quiz, None)?;
                if !legacy.title.is_empty() {
                    println!("TITLE: {}", legacy.title);
                }
                println!("{}", legacy.lines);
            }
        }
        Command::Check { file } => {
            let input = read_input(file.as_deref())?;
            let outcome = parse_strict(&input);
            for issue in &outcome.issues {
                eprintln!("{issue}");
            }
            println!(
                "{} valid question(s), {} error(s)",
                outcome.questions.len(),
                outcome.issues.len()
            );
            if !outcome.issues.is_empty() {
                std::process::exit(2);
            }
        }
        Command::Generate {
            topic,
            count,
            types,
            difficulty,
        } => {
            let config = GenerationConfig::load()?;
            let provider = resolve_provider(&config)?;

            let capped = count.min(config.max_count);
            if capped < count {
                warn!(requested = count, capped, "count capped by configuration");
            }

            let request = BatchRequest {
                topic,
                count: capped,
                kinds: kinds_option(types),
                difficulty,
                batch_size: None,
                max_passes: None,
            };
            let outcome = generate_in_batches(provider.as_ref(), &request).await?;
            info!(
                provider = %outcome.provider,
                model = %outcome.model,
                passes = outcome.passes,
                lines = outcome.lines.lines().count(),
                "generation complete"
            );
            if !outcome.title.is_empty() {
                println!("TITLE: {}", outcome.title);
            }
            println!("{}", outcome.lines);
        }
    }
    Ok(())
}

fn read_input(file: Option<&std::path::Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => std::io::read_to_string(std::io::stdin()).context("failed to read stdin"),
    }
}

fn kinds_option(types: Vec<QuestionKind>) -> Option<Vec<QuestionKind>> {
    if types.is_empty() {
        None
    } else {
        Some(types)
    }
}
