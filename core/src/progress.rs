//! Shared byte-progress counters for ingestion.
//!
//! One `ByteProgress` is shared (via `Arc`) across every per-source
//! ingestion thread and an optional progress-bar thread. Each ingestion
//! thread sets its slice of the total up front and adds to the processed
//! counter as it consumes its source file; the progress-bar thread only
//! reads. Plain `AtomicU64` is enough here — there is no cross-field
//! invariant to protect, unlike the append path in `store.rs`.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct ByteProgress {
    total: AtomicU64,
    processed: AtomicU64,
}

impl ByteProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `bytes` to the total expected to be processed. Called once per
    /// source up front, not updated as ingestion proceeds.
    pub fn add_total(&self, bytes: u64) {
        self.total.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn add_processed(&self, bytes: u64) {
        self.processed.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    /// Fraction complete in `[0.0, 1.0]`. `0.0` when nothing has been
    /// registered yet, rather than `NaN` from a `0/0` divide.
    pub fn fraction(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.processed() as f64 / total as f64).min(1.0)
    }
}
