//! Binary (de)serialization of [`SnapshotRecord`] and [`IndexEntry`].
//!
//! Every field is written at its documented width in little-endian order,
//! one field at a time. We deliberately do not reinterpret an in-memory
//! `#[repr(C)]` struct as raw bytes: Rust does not guarantee that a struct's
//! layout matches the field order we document in SPEC_FULL.md §4.4, so a
//! transmute-based codec would be a layout coincidence, not a contract.
//! Field-by-field encode/decode is what makes the on-disk format stable
//! regardless of how the compiler would lay the struct out.

use crate::model::{IndexEntry, SnapshotRecord, BOOK_DEPTH, SYMBOL_WIDTH};
use thiserror::Error;

/// symbol(8) + epoch(8) + 5*(price8+qty4)*2 sides + last_trade(8+4)
pub const RECORD_SIZE: usize = SYMBOL_WIDTH
    + 8
    + (BOOK_DEPTH * (8 + 4)) * 2
    + 8
    + 4;

/// epoch(8) + offset(8)
pub const INDEX_ENTRY_SIZE: usize = 8 + 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("expected a {expected}-byte record, got {actual} bytes")]
    WrongLength { expected: usize, actual: usize },
}

pub fn encode_record(record: &SnapshotRecord) -> [u8; RECORD_SIZE] {
    let mut buf = [0u8; RECORD_SIZE];
    let mut w = Writer::new(&mut buf);
    w.put_bytes(&record.symbol);
    w.put_i64(record.epoch);
    for i in 0..BOOK_DEPTH {
        w.put_f64(record.bid_prices[i]);
    }
    for i in 0..BOOK_DEPTH {
        w.put_i32(record.bid_quantities[i]);
    }
    for i in 0..BOOK_DEPTH {
        w.put_f64(record.ask_prices[i]);
    }
    for i in 0..BOOK_DEPTH {
        w.put_i32(record.ask_quantities[i]);
    }
    w.put_f64(record.last_trade_price);
    w.put_i32(record.last_trade_quantity);
    debug_assert_eq!(w.offset, RECORD_SIZE);
    buf
}

pub fn decode_record(bytes: &[u8]) -> Result<SnapshotRecord, CodecError> {
    if bytes.len() != RECORD_SIZE {
        return Err(CodecError::WrongLength {
            expected: RECORD_SIZE,
            actual: bytes.len(),
        });
    }
    let mut r = Reader::new(bytes);
    let mut symbol = [0u8; SYMBOL_WIDTH];
    symbol.copy_from_slice(r.take(SYMBOL_WIDTH));
    let epoch = r.get_i64();
    let mut bid_prices = [0.0; BOOK_DEPTH];
    for slot in bid_prices.iter_mut() {
        *slot = r.get_f64();
    }
    let mut bid_quantities = [0; BOOK_DEPTH];
    for slot in bid_quantities.iter_mut() {
        *slot = r.get_i32();
    }
    let mut ask_prices = [0.0; BOOK_DEPTH];
    for slot in ask_prices.iter_mut() {
        *slot = r.get_f64();
    }
    let mut ask_quantities = [0; BOOK_DEPTH];
    for slot in ask_quantities.iter_mut() {
        *slot = r.get_i32();
    }
    let last_trade_price = r.get_f64();
    let last_trade_quantity = r.get_i32();
    Ok(SnapshotRecord {
        symbol,
        epoch,
        bid_prices,
        bid_quantities,
        ask_prices,
        ask_quantities,
        last_trade_price,
        last_trade_quantity,
    })
}

pub fn encode_index_entry(entry: &IndexEntry) -> [u8; INDEX_ENTRY_SIZE] {
    let mut buf = [0u8; INDEX_ENTRY_SIZE];
    let mut w = Writer::new(&mut buf);
    w.put_i64(entry.epoch);
    w.put_i64(entry.offset);
    buf
}

pub fn decode_index_entry(bytes: &[u8]) -> Result<IndexEntry, CodecError> {
    if bytes.len() != INDEX_ENTRY_SIZE {
        return Err(CodecError::WrongLength {
            expected: INDEX_ENTRY_SIZE,
            actual: bytes.len(),
        });
    }
    let mut r = Reader::new(bytes);
    let epoch = r.get_i64();
    let offset = r.get_i64();
    Ok(IndexEntry { epoch, offset })
}

struct Writer<'a> {
    buf: &'a mut [u8],
    offset: usize,
}

impl<'a> Writer<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf[self.offset..self.offset + bytes.len()].copy_from_slice(bytes);
        self.offset += bytes.len();
    }

    fn put_i64(&mut self, v: i64) {
        self.put_bytes(&v.to_le_bytes());
    }

    fn put_i32(&mut self, v: i32) {
        self.put_bytes(&v.to_le_bytes());
    }

    fn put_f64(&mut self, v: f64) {
        self.put_bytes(&v.to_le_bytes());
    }
}

struct Reader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    fn take(&mut self, len: usize) -> &'a [u8] {
        let slice = &self.buf[self.offset..self.offset + len];
        self.offset += len;
        slice
    }

    fn get_i64(&mut self) -> i64 {
        i64::from_le_bytes(self.take(8).try_into().unwrap())
    }

    fn get_i32(&mut self) -> i32 {
        i32::from_le_bytes(self.take(4).try_into().unwrap())
    }

    fn get_f64(&mut self) -> f64 {
        f64::from_le_bytes(self.take(8).try_into().unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SnapshotRecord;

    #[test]
    fn record_size_matches_documented_layout() {
        assert_eq!(RECORD_SIZE, 148);
        assert_eq!(INDEX_ENTRY_SIZE, 16);
    }

    #[test]
    fn round_trip_empty_record() {
        let rec = SnapshotRecord::empty("AAPL", 42);
        let bytes = encode_record(&rec);
        let decoded = decode_record(&bytes).unwrap();
        assert_eq!(rec, decoded);
    }

    #[test]
    fn round_trip_populated_record() {
        let mut rec = SnapshotRecord::empty("NVDA", 1_700_000_000_000);
        rec.bid_prices[0] = 10.5;
        rec.bid_quantities[0] = 100;
        rec.ask_prices[0] = 11.0;
        rec.ask_quantities[0] = 50;
        rec.last_trade_price = 10.75;
        rec.last_trade_quantity = 25;
        let bytes = encode_record(&rec);
        assert_eq!(bytes.len(), RECORD_SIZE);
        let decoded = decode_record(&bytes).unwrap();
        assert_eq!(rec, decoded);
    }

    #[test]
    fn decode_rejects_wrong_length() {
        let err = decode_record(&[0u8; 10]).unwrap_err();
        assert_eq!(
            err,
            CodecError::WrongLength {
                expected: RECORD_SIZE,
                actual: 10
            }
        );
    }

    #[test]
    fn index_entry_round_trips() {
        let entry = IndexEntry {
            epoch: 123,
            offset: 456,
        };
        let bytes = encode_index_entry(&entry);
        assert_eq!(decode_index_entry(&bytes).unwrap(), entry);
    }
}
