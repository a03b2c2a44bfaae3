//! Time-bounded store of ingested quote batches
//!
//! Retention is bounded by wall-clock age rather than sample count, which
//! keeps the average responsive to recent conditions while smoothing out
//! single-provider noise.

use crate::types::PriceQuote;
use std::collections::BTreeMap;

/// Sliding window of quote batches keyed by ingestion timestamp (epoch millis)
#[derive(Debug, Default)]
pub struct PriceSampleWindow {
    batches: BTreeMap<i64, Vec<PriceQuote>>,
}

impl PriceSampleWindow {
    /// Creates an empty window
    pub fn new() -> Self {
        Self {
            batches: BTreeMap::new(),
        }
    }

    /// Removes every batch strictly older than `window_ms` relative to `now_ms`
    ///
    /// Must run before each insertion so the invariant holds after every
    /// ingest cycle: no retained key is older than the window length.
    pub fn evict_older_than(&mut self, now_ms: i64, window_ms: i64) {
        let cutoff = now_ms - window_ms;
        let retained = self.batches.split_off(&cutoff);
        let evicted = self.batches.len();
        self.batches = retained;
        if evicted > 0 {
            tracing::debug!(evicted_batches = evicted, "Evicted stale sample batches");
        }
    }

    /// Appends a batch keyed by its ingestion timestamp
    ///
    /// Two ingests landing on the same millisecond merge into one batch.
    pub fn insert(&mut self, timestamp_ms: i64, quotes: Vec<PriceQuote>) {
        self.batches.entry(timestamp_ms).or_default().extend(quotes);
    }

    /// Flattened iteration over all retained quotes, order irrelevant
    pub fn all_quotes(&self) -> impl Iterator<Item = &PriceQuote> {
        self.batches.values().flatten()
    }

    /// Number of retained batches
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Timestamp of the oldest retained batch, if any
    pub fn oldest_timestamp(&self) -> Option<i64> {
        self.batches.keys().next().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CoinCategory;

    fn quote(symbol: &str, value: f64) -> PriceQuote {
        PriceQuote::with_value(symbol, CoinCategory::Crypto, value, "test")
    }

    #[test]
    fn evicts_batches_older_than_window() {
        let mut window = PriceSampleWindow::new();
        window.insert(1_000, vec![quote("BTC", 100.0)]);
        window.insert(200_000, vec![quote("BTC", 200.0)]);
        window.insert(400_000, vec![quote("BTC", 300.0)]);

        window.evict_older_than(400_000, 300_000);

        assert_eq!(window.batch_count(), 2);
        assert_eq!(window.oldest_timestamp(), Some(200_000));
        // Remaining batches all satisfy the age bound.
        assert!(window
            .all_quotes()
            .all(|q| q.value.unwrap() >= 200.0));
    }

    #[test]
    fn batch_exactly_at_window_edge_is_retained() {
        let mut window = PriceSampleWindow::new();
        window.insert(0, vec![quote("BTC", 100.0)]);
        window.evict_older_than(300_000, 300_000);
        assert_eq!(window.batch_count(), 1);
    }

    #[test]
    fn all_quotes_flattens_across_batches() {
        let mut window = PriceSampleWindow::new();
        window.insert(1, vec![quote("BTC", 1.0), quote("USD", 2.0)]);
        window.insert(2, vec![quote("BTC", 3.0)]);
        assert_eq!(window.all_quotes().count(), 3);
    }

    #[test]
    fn same_timestamp_batches_merge() {
        let mut window = PriceSampleWindow::new();
        window.insert(5, vec![quote("BTC", 1.0)]);
        window.insert(5, vec![quote("BTC", 2.0)]);
        assert_eq!(window.batch_count(), 1);
        assert_eq!(window.all_quotes().count(), 2);
    }

    #[test]
    fn evicting_empty_window_is_a_noop() {
        let mut window = PriceSampleWindow::new();
        window.evict_older_than(1_000_000, 300_000);
        assert_eq!(window.batch_count(), 0);
    }
}
