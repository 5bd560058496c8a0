//! Snapshot store inspector.
//!
//! Small debug CLI to print the most recent snapshots persisted for a
//! symbol, for spot-checking a store on disk without writing a query
//! range by hand. Grounded in the teacher's `print-orderbook` debug tool:
//! same clap shape, same pretty/compact/json format switch.
//!
//! ## Usage
//!
//! ```bash
//! obs-inspect --symbol AAPL --store-dir ./data --count 5
//! obs-inspect --symbol AAPL --format json
//! ```

use anyhow::Context;
use clap::Parser;
use obs_core::{resolve_store_dir, SnapshotRecord, SnapshotStore};

#[derive(Parser)]
#[command(name = "obs-inspect", about = "Inspect a snapshot store for one symbol")]
struct Args {
    /// Symbol to inspect.
    #[arg(short, long)]
    symbol: String,

    /// Store directory; falls back to OBS_STORE_DIR then ./data.
    #[arg(long)]
    store_dir: Option<String>,

    /// Number of most recent snapshots to print.
    #[arg(short, long, default_value = "5")]
    count: usize,

    /// Output format: pretty, compact, or json.
    #[arg(short, long, default_value = "pretty")]
    format: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt().with_target(false).init();

    let store_dir = resolve_store_dir(args.store_dir.as_deref());
    let store = SnapshotStore::open(&store_dir).context("failed to open snapshot store")?;

    let records = store
        .scan_range(&args.symbol, i64::MIN, i64::MAX)
        .with_context(|| format!("failed to scan symbol {}", args.symbol))?;
    let tail: Vec<&SnapshotRecord> = records.iter().rev().take(args.count).collect();

    match args.format.as_str() {
        "json" => print_json(&tail)?,
        "compact" => print_compact(&tail),
        _ => print_pretty(&tail),
    }
    Ok(())
}

fn print_pretty(records: &[&SnapshotRecord]) {
    for rec in records {
        println!();
        println!("symbol={}  epoch={}", rec.symbol_str(), rec.epoch);
        println!("  bids:");
        for i in 0..5 {
            if rec.bid_prices[i] >= 0.0 {
                println!("    {:>8.2} x {}", rec.bid_prices[i], rec.bid_quantities[i]);
            }
        }
        println!("  asks:");
        for i in 0..5 {
            if rec.ask_prices[i] >= 0.0 {
                println!("    {:>8.2} x {}", rec.ask_prices[i], rec.ask_quantities[i]);
            }
        }
        if rec.has_last_trade() {
            println!(
                "  last trade: {:.2} x {}",
                rec.last_trade_price, rec.last_trade_quantity
            );
        }
    }
}

fn print_compact(records: &[&SnapshotRecord]) {
    for rec in records {
        println!(
            "{} {} bid1={:.2}x{} ask1={:.2}x{}",
            rec.symbol_str(),
            rec.epoch,
            rec.bid_prices[0],
            rec.bid_quantities[0],
            rec.ask_prices[0],
            rec.ask_quantities[0],
        );
    }
}

fn print_json(records: &[&SnapshotRecord]) -> anyhow::Result<()> {
    let values: Vec<_> = records
        .iter()
        .map(|rec| {
            serde_json::json!({
                "symbol": rec.symbol_str(),
                "epoch": rec.epoch,
                "bid_prices": rec.bid_prices,
                "bid_quantities": rec.bid_quantities,
                "ask_prices": rec.ask_prices,
                "ask_quantities": rec.ask_quantities,
                "last_trade_price": rec.last_trade_price,
                "last_trade_quantity": rec.last_trade_quantity,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}
