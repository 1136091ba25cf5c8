//! radix CLI - Command line interface for radix_index
//!
//! Builds an in-memory radix tree from a key file and reports on it, or
//! replays a script of add/search/delete operations against one. Nothing is
//! persisted between invocations.

use anyhow::Context;
use clap::{Parser, Subcommand};
use radix_index::{ByteSequence, RadixTree, TreeConfig};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "radix")]
#[command(about = "A PATRICIA radix tree over byte-sequence keys")]
#[command(version)]
struct Cli {
    /// Output format (json or text)
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    /// Treat keys as hex-encoded bytes
    #[arg(long)]
    hex: bool,

    /// Path to a JSON tree config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert every key of a file and print tree statistics
    Load {
        /// File with one `key` or `key<TAB>value` per line
        file: PathBuf,
    },

    /// Insert every key of a file and audit the tree structure
    Check {
        /// File with one `key` or `key<TAB>value` per line
        file: PathBuf,
    },

    /// Insert every key of a file and print the tree level by level
    Dump {
        /// File with one `key` or `key<TAB>value` per line
        file: PathBuf,
    },

    /// Replay `add <key> <value>`, `search <key>` and `delete <key>` lines
    Run {
        /// Script file
        script: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => TreeConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => TreeConfig::default(),
    };

    match &cli.command {
        Commands::Load { file } => {
            let tree = load_tree(file, cli.hex, config)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "stats": tree.stats(),
                }),
            );
        }

        Commands::Check { file } => {
            let tree = load_tree(file, cli.hex, config)?;
            let verified = tree.verify();
            let ok = verified.is_ok();
            output(
                &cli.format,
                &serde_json::json!({
                    "status": if ok { "ok" } else { "corrupt" },
                    "valid": ok,
                    "error": verified.err().map(|e| e.to_string()),
                    "stats": tree.stats(),
                }),
            );
            if !ok {
                std::process::exit(1);
            }
        }

        Commands::Dump { file } => {
            let tree = load_tree(file, cli.hex, config)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "levels": tree.level_order(),
                }),
            );
        }

        Commands::Run { script } => {
            let content = std::fs::read_to_string(script)
                .with_context(|| format!("reading {}", script.display()))?;
            let mut tree: RadixTree<String> = RadixTree::with_config(config);

            for (n, line) in content.lines().enumerate() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                let result = run_line(&mut tree, line, cli.hex)
                    .with_context(|| format!("line {}: {}", n + 1, line))?;
                output(&cli.format, &result);
            }
            info!(keys = tree.len(), "script finished");
        }
    }

    Ok(())
}

fn run_line(
    tree: &mut RadixTree<String>,
    line: &str,
    hex: bool,
) -> anyhow::Result<serde_json::Value> {
    let mut parts = line.splitn(3, char::is_whitespace);
    let op = parts.next().unwrap_or_default();
    let key = parts
        .next()
        .ok_or_else(|| anyhow::anyhow!("missing key"))?;
    let bytes = parse_key(key, hex)?;

    match op {
        "add" => {
            let value = parts.next().unwrap_or_default().trim().to_string();
            tree.add(&bytes, value)?;
            Ok(serde_json::json!({ "op": "add", "key": key, "keys": tree.len() }))
        }
        "search" => {
            let lookup = tree.search(&bytes);
            Ok(serde_json::json!({
                "op": "search",
                "key": key,
                "found": lookup.found,
                "value": lookup.value,
            }))
        }
        "delete" => {
            let deleted = tree.delete(&bytes)?;
            Ok(serde_json::json!({ "op": "delete", "key": key, "deleted": deleted }))
        }
        other => Err(anyhow::anyhow!("unknown operation: {}", other)),
    }
}

fn parse_key(key: &str, hex: bool) -> anyhow::Result<ByteSequence> {
    if hex {
        Ok(ByteSequence::from_hex(key).map_err(radix_index::Error::from)?)
    } else {
        Ok(ByteSequence::from(key))
    }
}

/// Build a tree from a key file; a missing value defaults to the line number
fn load_tree(path: &Path, hex: bool, config: TreeConfig) -> anyhow::Result<RadixTree<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let mut tree = RadixTree::with_config(config);

    for (n, line) in content.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let (key, value) = match line.split_once('\t') {
            Some((key, value)) => (key, value.to_string()),
            None => (line, (n + 1).to_string()),
        };
        let bytes = parse_key(key, hex).with_context(|| format!("line {}", n + 1))?;
        tree.add(&bytes, value)?;
    }

    debug!(keys = tree.len(), nodes = tree.node_count(), "loaded key file");
    Ok(tree)
}

fn output(format: &OutputFormat, value: &serde_json::Value) {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string(value),
        OutputFormat::Text => serde_json::to_string_pretty(value),
    };
    match rendered {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("failed to render output: {}", e),
    }
}
