//! Ingestion coordinator and per-source worker.
//!
//! One worker per configured `(symbol, path)` source, each running on its
//! own `std::thread`. Grounded in the teacher's `AsyncJournal` (one thread
//! owning a file) and the original `BookProcessor::process`/`processFile`
//! split (spawn-per-file, join-all).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use obs_core::{ByteProgress, OrderBook, SnapshotStore};

use crate::parser;

/// One configured ingestion input: a symbol and the file to read events
/// for it from.
#[derive(Debug, Clone)]
pub struct Source {
    pub symbol: String,
    pub path: PathBuf,
}

/// Runs every configured source to completion on its own thread, driving
/// an ASCII progress bar on the calling thread until all workers join.
/// Returns the number of lines successfully applied across all sources.
pub fn run(sources: &[Source], store: Arc<SnapshotStore>) -> anyhow::Result<u64> {
    let progress = Arc::new(ByteProgress::new());
    for source in sources {
        let len = std::fs::metadata(&source.path)
            .map(|m| m.len())
            .unwrap_or(0);
        progress.add_total(len);
    }

    let start = Instant::now();
    let done = Arc::new(std::sync::atomic::AtomicBool::new(false));

    let bar_handle = {
        let progress = Arc::clone(&progress);
        let done = Arc::clone(&done);
        thread::spawn(move || render_progress_bar(&progress, &done))
    };

    let mut handles = Vec::with_capacity(sources.len());
    for source in sources.iter().cloned() {
        let store = Arc::clone(&store);
        let progress = Arc::clone(&progress);
        handles.push(thread::spawn(move || process_source(&source, &store, &progress)));
    }

    let mut total_applied = 0u64;
    for handle in handles {
        match handle.join() {
            Ok(Ok(applied)) => total_applied += applied,
            Ok(Err(e)) => tracing::error!(error = %e, "ingestion worker failed"),
            Err(_) => tracing::error!("ingestion worker thread panicked"),
        }
    }

    done.store(true, std::sync::atomic::Ordering::Relaxed);
    bar_handle.join().ok();

    let elapsed = start.elapsed();
    println!("Total processing time: {} seconds.", elapsed.as_secs());

    Ok(total_applied)
}

fn process_source(
    source: &Source,
    store: &SnapshotStore,
    progress: &ByteProgress,
) -> anyhow::Result<u64> {
    let file = File::open(&source.path)
        .map_err(|e| anyhow::anyhow!("failed to open {}: {e}", source.path.display()))?;
    let reader = BufReader::new(file);

    let mut book = OrderBook::new(source.symbol.clone());
    let mut applied = 0u64;

    for line in reader.lines() {
        let line = line.map_err(|e| anyhow::anyhow!("read error in {}: {e}", source.path.display()))?;
        progress.add_processed(line.len() as u64 + 1);
        if line.is_empty() {
            continue;
        }

        let order = match parser::parse_line(&line) {
            Ok(order) => order,
            Err(e) => {
                tracing::warn!(line = %line, reason = %e, "failed to parse line");
                continue;
            }
        };

        book.apply(&order);
        let snapshot = book.snapshot(order.epoch);
        if let Err(e) = store.append(&source.symbol, &snapshot) {
            tracing::error!(error = %e, symbol = %source.symbol, "failed to append snapshot");
            continue;
        }
        applied += 1;
    }

    tracing::info!(path = %source.path.display(), "completed processing file");
    Ok(applied)
}

fn render_progress_bar(progress: &ByteProgress, done: &std::sync::atomic::AtomicBool) {
    const BAR_WIDTH: usize = 50;
    while !done.load(std::sync::atomic::Ordering::Relaxed) {
        print_bar(progress.fraction(), BAR_WIDTH);
        thread::sleep(Duration::from_millis(200));
    }
    print_bar(1.0, BAR_WIDTH);
    println!();
}

fn print_bar(fraction: f64, width: usize) {
    let pos = (width as f64 * fraction) as usize;
    print!("\r[");
    for i in 0..width {
        if i < pos {
            print!("#");
        } else if i == pos {
            print!(">");
        } else {
            print!(" ");
        }
    }
    print!("] {:.1} %", fraction * 100.0);
    use std::io::Write;
    std::io::stdout().flush().ok();
}
