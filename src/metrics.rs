//! Per-provider ingest metrics
//!
//! Tracks decode latency histograms, success rates, and quote throughput for
//! each registered provider.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Maximum number of samples to keep for metrics calculation
const MAX_SAMPLES: usize = 100;

/// Snapshot of one provider's ingest metrics
#[derive(Debug, Clone)]
pub struct IngestMetrics {
    /// Provider id the metrics belong to
    pub provider_id: String,
    /// 50th percentile decode latency in milliseconds
    pub decode_p50_ms: f64,
    /// 99th percentile decode latency in milliseconds
    pub decode_p99_ms: f64,
    /// Fraction of ingest cycles that decoded successfully (0.0 to 1.0)
    pub success_rate: f64,
    /// Total ingest cycles observed
    pub total_cycles: u64,
    /// Cycles whose payload failed to decode
    pub failed_cycles: u64,
    /// Total quotes ingested across all cycles
    pub quotes_ingested: u64,
}

impl IngestMetrics {
    /// Creates metrics with no data
    pub fn empty(provider_id: &str) -> Self {
        Self {
            provider_id: provider_id.to_string(),
            decode_p50_ms: 0.0,
            decode_p99_ms: 0.0,
            success_rate: 1.0,
            total_cycles: 0,
            failed_cycles: 0,
            quotes_ingested: 0,
        }
    }
}

/// Internal sample for one ingest cycle
#[derive(Debug, Clone)]
struct CycleSample {
    duration_ms: f64,
    success: bool,
}

#[derive(Debug, Default)]
struct Totals {
    cycles: u64,
    failed: u64,
    quotes: u64,
}

/// Collects and computes ingest metrics for one provider
pub struct MetricsCollector {
    provider_id: String,
    samples: Arc<RwLock<VecDeque<CycleSample>>>,
    totals: Arc<RwLock<Totals>>,
}

impl MetricsCollector {
    /// Creates a new metrics collector for a provider
    pub fn new(provider_id: &str) -> Self {
        Self {
            provider_id: provider_id.to_string(),
            samples: Arc::new(RwLock::new(VecDeque::with_capacity(MAX_SAMPLES))),
            totals: Arc::new(RwLock::new(Totals::default())),
        }
    }

    /// Records one ingest cycle
    pub async fn record_cycle(&self, duration: Duration, success: bool, quotes: usize) {
        let duration_ms = duration.as_secs_f64() * 1000.0;

        {
            let mut totals = self.totals.write().await;
            totals.cycles += 1;
            totals.quotes += quotes as u64;
            if !success {
                totals.failed += 1;
            }
        }

        let mut samples = self.samples.write().await;
        if samples.len() >= MAX_SAMPLES {
            samples.pop_front();
        }
        samples.push_back(CycleSample {
            duration_ms,
            success,
        });
    }

    /// Computes current metrics from collected samples
    pub async fn snapshot(&self) -> IngestMetrics {
        let samples = self.samples.read().await;
        let totals = self.totals.read().await;

        if samples.is_empty() {
            return IngestMetrics::empty(&self.provider_id);
        }

        let mut latencies: Vec<f64> = samples
            .iter()
            .filter(|s| s.success)
            .map(|s| s.duration_ms)
            .collect();
        latencies.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let success_rate = if totals.cycles > 0 {
            (totals.cycles - totals.failed) as f64 / totals.cycles as f64
        } else {
            1.0
        };

        IngestMetrics {
            provider_id: self.provider_id.clone(),
            decode_p50_ms: percentile(&latencies, 50.0),
            decode_p99_ms: percentile(&latencies, 99.0),
            success_rate,
            total_cycles: totals.cycles,
            failed_cycles: totals.failed,
            quotes_ingested: totals.quotes,
        }
    }
}

/// Calculate percentile from sorted values
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let idx = (p / 100.0 * (sorted_values.len() - 1) as f64).round() as usize;
    sorted_values[idx.min(sorted_values.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collector_tracks_cycles_and_quotes() {
        let collector = MetricsCollector::new("test");

        collector
            .record_cycle(Duration::from_millis(100), true, 3)
            .await;
        collector
            .record_cycle(Duration::from_millis(200), true, 1)
            .await;
        collector
            .record_cycle(Duration::from_millis(150), false, 0)
            .await;

        let metrics = collector.snapshot().await;
        assert_eq!(metrics.provider_id, "test");
        assert_eq!(metrics.total_cycles, 3);
        assert_eq!(metrics.failed_cycles, 1);
        assert_eq!(metrics.quotes_ingested, 4);
        assert!(metrics.success_rate > 0.6 && metrics.success_rate < 0.7);
    }

    #[tokio::test]
    async fn empty_collector_reports_empty_snapshot() {
        let collector = MetricsCollector::new("idle");
        let metrics = collector.snapshot().await;
        assert_eq!(metrics.total_cycles, 0);
        assert_eq!(metrics.success_rate, 1.0);
    }

    #[test]
    fn percentile_of_sorted_values() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        assert_eq!(percentile(&values, 50.0), 5.0);
        assert_eq!(percentile(&values, 99.0), 10.0);
    }
}
