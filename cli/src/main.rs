//! `obs` — ingest order event feeds into snapshot stores, and query them.
//!
//! Two subcommands, grounded in the original program's two modes: running
//! with sources configured processes them in parallel threads and exits;
//! `query` reads back a time range across one or more symbols.

mod ingest;
mod logging;
mod parser;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use obs_core::{resolve_store_dir, QueryCriteria, QueryEngine, SnapshotStore};

use ingest::Source;

#[derive(Parser)]
#[command(name = "obs", about = "Order book snapshot ingestion and query tool")]
struct Cli {
    /// Log verbosity when RUST_LOG is not set.
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Emit structured JSON log lines instead of human-readable ones.
    #[arg(long, global = true)]
    json_logs: bool,

    /// Directory snapshot/index files are read from and written to.
    #[arg(long, global = true)]
    store_dir: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,

    /// `SYMBOL=PATH` sources to ingest when no subcommand is given.
    #[arg(long = "source", value_name = "SYMBOL=PATH")]
    source: Vec<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest one or more event sources.
    Ingest {
        #[arg(long = "source", value_name = "SYMBOL=PATH")]
        source: Vec<String>,
    },
    /// Query snapshots across a time range.
    Query {
        /// `ALL` or a comma-separated symbol list.
        symbols: String,
        start_epoch: i64,
        end_epoch: i64,
        /// Optional comma-separated field projection.
        fields: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logger(&cli.log_level, cli.json_logs);

    let store_dir = resolve_store_dir(cli.store_dir.as_deref());

    match cli.command {
        Some(Command::Ingest { source }) => run_ingest(&source, &store_dir),
        Some(Command::Query {
            symbols,
            start_epoch,
            end_epoch,
            fields,
        }) => run_query(&symbols, start_epoch, end_epoch, fields.as_deref(), &store_dir),
        None if !cli.source.is_empty() => run_ingest(&cli.source, &store_dir),
        None => {
            print_usage();
            Ok(())
        }
    }
}

fn run_ingest(raw_sources: &[String], store_dir: &PathBuf) -> anyhow::Result<()> {
    let sources = parse_sources(raw_sources)?;
    let store = Arc::new(SnapshotStore::open(store_dir).context("failed to open snapshot store")?);
    let applied = ingest::run(&sources, store)?;
    tracing::info!(records = applied, "ingestion complete");
    Ok(())
}

fn parse_sources(raw: &[String]) -> anyhow::Result<Vec<Source>> {
    raw.iter()
        .map(|entry| {
            let (symbol, path) = entry
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("invalid --source \"{entry}\", expected SYMBOL=PATH"))?;
            Ok(Source {
                symbol: symbol.to_string(),
                path: PathBuf::from(path),
            })
        })
        .collect()
}

fn run_query(
    symbols_arg: &str,
    start_epoch: i64,
    end_epoch: i64,
    fields_arg: Option<&str>,
    store_dir: &PathBuf,
) -> anyhow::Result<()> {
    let store = SnapshotStore::open(store_dir).context("failed to open snapshot store")?;
    let symbols: Vec<String> = if symbols_arg == "ALL" {
        discover_symbols(store_dir)?
    } else {
        symbols_arg.split(',').map(str::to_string).collect()
    };

    let criteria = QueryCriteria::new(symbols, start_epoch, end_epoch);
    let engine = QueryEngine::new(&store);
    let results = engine.query(&criteria).context("query failed")?;

    match fields_arg {
        None => render::render_default(&results),
        Some(raw) => {
            let requested: Vec<String> = raw.split(',').map(str::to_string).collect();
            render::render_selected(&results, &requested)
                .map_err(|e| anyhow::anyhow!("{e}"))?;
        }
    }
    Ok(())
}

/// `ALL` discovers symbols from the `.snap` files present in `store_dir`
/// rather than requiring the caller to enumerate them.
fn discover_symbols(store_dir: &PathBuf) -> anyhow::Result<Vec<String>> {
    let mut symbols = Vec::new();
    let entries = match std::fs::read_dir(store_dir) {
        Ok(entries) => entries,
        Err(_) => return Ok(symbols),
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("snap") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                symbols.push(stem.to_string());
            }
        }
    }
    symbols.sort();
    Ok(symbols)
}

fn print_usage() {
    println!("Correct Usage:");
    println!("  obs --source SYMBOL=PATH [--source SYMBOL=PATH ...]   // Ingest event sources");
    println!("  obs query <symbols> <startEpoch> <endEpoch> [<fields>]");
    println!("     <symbols>: comma-separated list (or ALL)");
    println!("     <fields>: comma-separated list from:");
    println!("         {}", render::ALLOWED_FIELDS.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sources_splits_symbol_and_path() {
        let sources = parse_sources(&["AAPL=Data/AAPL.log".to_string()]).unwrap();
        assert_eq!(sources[0].symbol, "AAPL");
        assert_eq!(sources[0].path, PathBuf::from("Data/AAPL.log"));
    }

    #[test]
    fn parse_sources_rejects_missing_equals() {
        assert!(parse_sources(&["AAPL-Data/AAPL.log".to_string()]).is_err());
    }
}
