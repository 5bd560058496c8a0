//! Cross-symbol range queries over a [`SnapshotStore`].

use crate::errors::QueryError;
use crate::model::SnapshotRecord;
use crate::store::SnapshotStore;

/// A bounded, possibly multi-symbol query.
#[derive(Debug, Clone)]
pub struct QueryCriteria {
    pub symbols: Vec<String>,
    pub start_epoch: i64,
    pub end_epoch: i64,
}

impl QueryCriteria {
    pub fn new(symbols: Vec<String>, start_epoch: i64, end_epoch: i64) -> Self {
        Self {
            symbols,
            start_epoch,
            end_epoch,
        }
    }
}

pub struct QueryEngine<'a> {
    store: &'a SnapshotStore,
}

impl<'a> QueryEngine<'a> {
    pub fn new(store: &'a SnapshotStore) -> Self {
        Self { store }
    }

    /// Scans every symbol in `criteria.symbols` and returns the union,
    /// sorted ascending by epoch (symbols at equal epoch keep whatever
    /// relative order the caller's symbol list specified, since the sort
    /// is stable).
    pub fn query(&self, criteria: &QueryCriteria) -> Result<Vec<SnapshotRecord>, QueryError> {
        if criteria.symbols.is_empty() {
            return Err(QueryError::NoSymbols);
        }
        if criteria.start_epoch > criteria.end_epoch {
            return Err(QueryError::InvertedRange {
                start: criteria.start_epoch,
                end: criteria.end_epoch,
            });
        }

        let mut merged = Vec::new();
        for symbol in &criteria.symbols {
            let records =
                self.store
                    .scan_range(symbol, criteria.start_epoch, criteria.end_epoch)?;
            merged.extend(records);
        }
        merged.sort_by_key(|r| r.epoch);
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SnapshotRecord;
    use tempfile::tempdir;

    #[test]
    fn merges_and_sorts_across_symbols() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();
        store
            .append("AAPL", &SnapshotRecord::empty("AAPL", 10))
            .unwrap();
        store
            .append("MSFT", &SnapshotRecord::empty("MSFT", 5))
            .unwrap();
        store
            .append("AAPL", &SnapshotRecord::empty("AAPL", 20))
            .unwrap();

        let engine = QueryEngine::new(&store);
        let criteria = QueryCriteria::new(
            vec!["AAPL".to_string(), "MSFT".to_string()],
            0,
            100,
        );
        let results = engine.query(&criteria).unwrap();
        let epochs: Vec<i64> = results.iter().map(|r| r.epoch).collect();
        assert_eq!(epochs, vec![5, 10, 20]);
    }

    #[test]
    fn rejects_empty_symbol_list() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();
        let engine = QueryEngine::new(&store);
        let criteria = QueryCriteria::new(vec![], 0, 100);
        assert!(matches!(
            engine.query(&criteria),
            Err(QueryError::NoSymbols)
        ));
    }

    #[test]
    fn rejects_inverted_range() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();
        let engine = QueryEngine::new(&store);
        let criteria = QueryCriteria::new(vec!["AAPL".to_string()], 100, 0);
        assert!(matches!(
            engine.query(&criteria),
            Err(QueryError::InvertedRange { start: 100, end: 0 })
        ));
    }
}
