//! `nest`: inspect nested JSON documents from the command line.
//!
//! Reads a JSON document from a file (or stdin when the path is omitted or
//! `-`) and prints its leaves, shape, structural fingerprint or leaf count, or
//! checks that two documents share a structure.
//!
//! ## Configuration
//!
//! - `--max-depth` / `NEST_MAX_DEPTH`: keep substructures of at most this depth
//!   as single leaves (0 treats only scalars as leaves)
//! - `--max-nesting` / `NEST_MAX_NESTING`: reject input nested deeper
//! - `RUST_LOG`: log filter (default `nest=info`)
//! - `LOG_FORMAT`: `pretty` (default) or `json`; logs go to stderr

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use nest_kernel::{
    from_json, has_max_depth, to_json, JsonTree, MaxDepth, NestConfig, Nester,
    DEFAULT_MAX_NESTING,
};

#[derive(Parser, Debug)]
#[command(name = "nest", version, about = "Traverse and compare nested JSON structures")]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "NEST_MAX_DEPTH",
        default_value_t = 0,
        help = "Treat substructures of at most this depth as leaves"
    )]
    max_depth: usize,
    #[arg(
        long,
        global = true,
        env = "NEST_MAX_NESTING",
        default_value_t = DEFAULT_MAX_NESTING,
        help = "Reject input nested deeper than this many containers"
    )]
    max_nesting: usize,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the leaves as a JSON array, in canonical order.
    Flatten { input: Option<PathBuf> },
    /// Print the structural skeleton as JSON.
    Shape { input: Option<PathBuf> },
    /// Print the 64-bit structural fingerprint.
    Fingerprint { input: Option<PathBuf> },
    /// Print the number of leaves.
    LeafCount { input: Option<PathBuf> },
    /// Fail unless two documents have the same structure.
    SameStructure { left: PathBuf, right: PathBuf },
}

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "nest=info,nest_kernel=info".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr)
                    .flatten_event(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

fn read_document(input: Option<&Path>) -> Result<JsonTree> {
    let text = match input {
        None => read_stdin()?,
        Some(path) if path == Path::new("-") => read_stdin()?,
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
    };
    let json: serde_json::Value = serde_json::from_str(&text).context("Input is not valid JSON")?;
    Ok(from_json(json))
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read stdin")?;
    Ok(text)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let nester: Nester<MaxDepth> = Nester::new(NestConfig::new(true, Some(cli.max_nesting)))
        .with_atomic(has_max_depth(cli.max_depth));
    debug!(
        max_depth = cli.max_depth,
        max_nesting = cli.max_nesting,
        "Configured nester"
    );

    match cli.command {
        Commands::Flatten { input } => {
            let tree = read_document(input.as_deref())?;
            let leaves: Vec<serde_json::Value> =
                nester.flatten(&tree)?.into_iter().map(to_json).collect();
            info!(leaves = leaves.len(), "Flattened document");
            println!("{}", serde_json::to_string_pretty(&leaves)?);
        }
        Commands::Shape { input } => {
            let tree = read_document(input.as_deref())?;
            let shape = nester.structure(&tree)?;
            println!("{}", serde_json::to_string_pretty(&shape)?);
        }
        Commands::Fingerprint { input } => {
            let tree = read_document(input.as_deref())?;
            let shape = nester.structure(&tree)?;
            info!(depth = shape.depth(), leaves = shape.leaf_count(), "Fingerprinted document");
            println!("{}", shape.fingerprint_hex());
        }
        Commands::LeafCount { input } => {
            let tree = read_document(input.as_deref())?;
            println!("{}", nester.leaf_count(&tree)?);
        }
        Commands::SameStructure { left, right } => {
            let left_tree = read_document(Some(left.as_path()))?;
            let right_tree = read_document(Some(right.as_path()))?;
            nester
                .assert_same_structure(&left_tree, &right_tree)
                .with_context(|| {
                    format!("{} and {} differ", left.display(), right.display())
                })?;
            info!("Documents share a structure");
            println!("same");
        }
    }
    Ok(())
}
