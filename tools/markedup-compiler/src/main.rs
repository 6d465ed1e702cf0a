use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use ccg_deps::{LoadOptions, Markedup};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Validated rkyv archive, loaded with `Markedup::from_bytes`
    Rkyv,
    /// The same archive as JSON, for inspection
    Json,
}

#[derive(Parser)]
#[command(author, version, about = "Compiles a markedup lexicon to an rkyv archive")]
struct Cli {
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    #[arg(short, long, value_enum, default_value_t = Format::Rkyv)]
    format: Format,

    /// Drop entries whose spine ids are not threaded through an argument
    #[arg(long)]
    strict: bool,

    /// Fail instead of writing a lexicon with skipped entries
    #[arg(long)]
    deny_skipped: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!(input = %cli.input.display(), "reading markedup lexicon");
    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    let options = LoadOptions { strict: cli.strict };
    let (markedup, skipped) = Markedup::parse_with(&text, options);
    info!(entries = markedup.len(), skipped = skipped.len(), "parsed lexicon");

    if !skipped.is_empty() {
        warn!(count = skipped.len(), "some entries were skipped");
        if cli.deny_skipped {
            let first = &skipped[0];
            bail!(
                "{} entries skipped, first at line {} ({}): {}",
                skipped.len(),
                first.line,
                first.category,
                first.reason
            );
        }
    }

    let bytes = match cli.format {
        Format::Rkyv => {
            let bytes = markedup.to_bytes()?;
            // Reload to catch anything the loader would reject
            let (reloaded, rejected) = Markedup::from_bytes(&bytes, options)?;
            if reloaded.len() != markedup.len() || !rejected.is_empty() {
                bail!("archive does not reload to the same lexicon");
            }
            bytes
        }
        Format::Json => serde_json::to_vec_pretty(&markedup.to_archive())?,
    };

    fs::write(&cli.output, &bytes).with_context(|| format!("failed to write {}", cli.output.display()))?;
    info!(output = %cli.output.display(), bytes = bytes.len(), "archive written");
    Ok(())
}
