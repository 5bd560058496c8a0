//! In-memory event and snapshot types.
//!
//! `Order` is the transient per-event value produced by the feed parser
//! (external to this crate, see the `obs-cli` ingest module). Everything
//! downstream of the parser — the book engine, the store, the query engine —
//! operates on the types in this module.

use std::cmp::Ordering;

/// Width of the zero-padded symbol field in a persisted [`SnapshotRecord`].
pub const SYMBOL_WIDTH: usize = 8;

/// Number of bid/ask levels carried in a snapshot.
pub const BOOK_DEPTH: usize = 5;

/// Sentinel price for an unpopulated level or an absent last trade.
pub const SENTINEL_PRICE: f64 = -1.0;

/// Sentinel quantity for an unpopulated level or an absent last trade.
pub const SENTINEL_QUANTITY: i32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    New,
    Cancel,
    Trade,
}

/// A single NEW/CANCEL/TRADE event read from the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub epoch: i64,
    pub order_id: String,
    pub symbol: String,
    pub side: Side,
    pub category: Category,
    pub price: f64,
    pub quantity: i32,
}

/// An `f64` newtype ordered with [`f64::total_cmp`] so it can key a
/// `BTreeMap`. The feed is not expected to carry NaN prices, but
/// `total_cmp` gives a well-defined (if not meaningful) order for them
/// rather than silently dropping levels the way `partial_cmp` would.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Price(pub f64);

impl Eq for Price {}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Price {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// A resting order's remaining state: the price it rests at (which may
/// differ from a later CANCEL/TRADE event's price) and its outstanding
/// quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestingOrder {
    pub price: f64,
    pub remaining: i32,
}

/// Fixed-layout, persisted view of a book at one epoch.
///
/// The symbol is stored zero-padded to [`SYMBOL_WIDTH`] bytes rather than as
/// a `String` so the in-memory shape mirrors the on-disk shape exactly;
/// see `codec.rs` for the explicit field-by-field (de)serialization.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapshotRecord {
    pub symbol: [u8; SYMBOL_WIDTH],
    pub epoch: i64,
    pub bid_prices: [f64; BOOK_DEPTH],
    pub bid_quantities: [i32; BOOK_DEPTH],
    pub ask_prices: [f64; BOOK_DEPTH],
    pub ask_quantities: [i32; BOOK_DEPTH],
    pub last_trade_price: f64,
    pub last_trade_quantity: i32,
}

impl SnapshotRecord {
    /// Builds a record with every level set to the sentinel, symbol
    /// zero-padded/truncated to [`SYMBOL_WIDTH`] bytes.
    pub fn empty(symbol: &str, epoch: i64) -> Self {
        Self {
            symbol: pack_symbol(symbol),
            epoch,
            bid_prices: [SENTINEL_PRICE; BOOK_DEPTH],
            bid_quantities: [SENTINEL_QUANTITY; BOOK_DEPTH],
            ask_prices: [SENTINEL_PRICE; BOOK_DEPTH],
            ask_quantities: [SENTINEL_QUANTITY; BOOK_DEPTH],
            last_trade_price: SENTINEL_PRICE,
            last_trade_quantity: SENTINEL_QUANTITY,
        }
    }

    /// Symbol with trailing zero bytes trimmed.
    pub fn symbol_str(&self) -> &str {
        let len = self
            .symbol
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(SYMBOL_WIDTH);
        std::str::from_utf8(&self.symbol[..len]).unwrap_or("")
    }

    pub fn has_last_trade(&self) -> bool {
        self.last_trade_price >= 0.0
    }
}

/// Zero-pads or truncates `symbol` to [`SYMBOL_WIDTH`] bytes.
pub fn pack_symbol(symbol: &str) -> [u8; SYMBOL_WIDTH] {
    let mut out = [0u8; SYMBOL_WIDTH];
    let bytes = symbol.as_bytes();
    let n = bytes.len().min(SYMBOL_WIDTH);
    out[..n].copy_from_slice(&bytes[..n]);
    out
}

/// One (epoch, offset) pair in a symbol's index file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub epoch: i64,
    pub offset: i64,
}
