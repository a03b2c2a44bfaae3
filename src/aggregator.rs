//! Aggregation coordinator
//!
//! Owns the sample window and the latest-price table, and exposes the two
//! entry points the outside world drives: `ingest` for raw provider payloads
//! re-entering from the transport, and `query` for current averaged prices.

use crate::{
    averager::SymbolAverager,
    constants::PRICE_WINDOW_MS,
    error::QueryError,
    metrics::{IngestMetrics, MetricsCollector},
    provider::PricingProvider,
    providers::{ExchangeRateProvider, FeeEstimateProvider, ScrapingRateProvider},
    registry::CoinTypeRegistry,
    transport::FetchTransport,
    types::{AggregationEvent, PriceQuote, PriceReply},
    window::PriceSampleWindow,
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

/// Capacity of the aggregation event channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// One registered provider with its metrics collector
struct ProviderSlot {
    provider: Arc<dyn PricingProvider>,
    metrics: MetricsCollector,
}

/// Window and table, guarded as one unit
///
/// Evict + insert + reaverage + table update must be observed atomically by
/// readers, so both live behind a single lock.
#[derive(Default)]
struct AggregationState {
    window: PriceSampleWindow,
    latest: HashMap<String, PriceQuote>,
}

/// Orchestrates ingest, eviction, averaging, and query
///
/// `ingest` is the sole writer and takes the write lock for the whole pass;
/// `query` and `all_prices` are read-only and may run concurrently.
pub struct AggregationCoordinator {
    providers: HashMap<&'static str, ProviderSlot>,
    registry: CoinTypeRegistry,
    state: RwLock<AggregationState>,
    events: broadcast::Sender<AggregationEvent>,
    window_ms: i64,
}

impl AggregationCoordinator {
    /// Creates a coordinator with the default provider set
    pub fn new() -> Self {
        Self::with_providers(vec![
            Arc::new(ExchangeRateProvider::new()),
            Arc::new(ScrapingRateProvider::new()),
            Arc::new(FeeEstimateProvider::new()),
        ])
    }

    /// Creates a coordinator with a custom provider set
    ///
    /// Registrations are static for the coordinator's lifetime.
    pub fn with_providers(providers: Vec<Arc<dyn PricingProvider>>) -> Self {
        let providers = providers
            .into_iter()
            .map(|provider| {
                let id = provider.provider_id();
                let metrics = MetricsCollector::new(id);
                (id, ProviderSlot { provider, metrics })
            })
            .collect();
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            providers,
            registry: CoinTypeRegistry::new(),
            state: RwLock::new(AggregationState::default()),
            events,
            window_ms: PRICE_WINDOW_MS,
        }
    }

    /// Ingests a raw payload attributed to a provider, stamped with now
    pub async fn ingest(&self, provider_id: &str, raw: &[u8]) {
        self.ingest_at(provider_id, raw, Utc::now().timestamp_millis())
            .await
    }

    /// Clock-explicit ingest
    ///
    /// `now_ms` keys the new batch and anchors eviction. Split out so hosts
    /// with their own clock source (and tests) can pin the timestamp.
    pub async fn ingest_at(&self, provider_id: &str, raw: &[u8], now_ms: i64) {
        let Some(slot) = self.providers.get(provider_id) else {
            tracing::warn!(provider_id, "Ignoring payload from unregistered provider");
            return;
        };

        let start = Instant::now();
        let quotes = match slot.provider.decode(raw) {
            Ok(quotes) => quotes,
            Err(e) => {
                tracing::warn!(
                    provider_id,
                    error = %e,
                    "Payload decode failed; cycle contributes no quotes"
                );
                slot.metrics.record_cycle(start.elapsed(), false, 0).await;
                self.emit(AggregationEvent::DecodeFailed {
                    id: Uuid::new_v4(),
                    provider_id: provider_id.to_string(),
                    error_message: e.to_string(),
                    timestamp: Utc::now(),
                });
                return;
            }
        };
        slot.metrics
            .record_cycle(start.elapsed(), true, quotes.len())
            .await;

        let mut updated = Vec::new();
        let mut skipped = Vec::new();
        {
            let mut state = self.state.write().await;

            // Eviction always precedes insertion within one ingest.
            state.window.evict_older_than(now_ms, self.window_ms);
            if !quotes.is_empty() {
                state.window.insert(now_ms, quotes);
            }

            let averages = SymbolAverager::averages(state.window.all_quotes());
            for (symbol, (category, means)) in averages {
                match self.registry.construct(category, &symbol, &means) {
                    Ok(fresh) => {
                        let merged = merge_retaining(state.latest.get(&symbol), fresh);
                        state.latest.insert(symbol.clone(), merged);
                        updated.push(symbol);
                    }
                    Err(e) => {
                        tracing::warn!(symbol = %symbol, error = %e, "Skipping symbol");
                        skipped.push(symbol);
                    }
                }
            }
        }

        for symbol in skipped {
            self.emit(AggregationEvent::SymbolSkipped {
                id: Uuid::new_v4(),
                symbol,
                timestamp: Utc::now(),
            });
        }
        if !updated.is_empty() {
            tracing::debug!(
                provider_id,
                symbols = updated.len(),
                "Aggregation pass updated latest prices"
            );
            self.emit(AggregationEvent::PricesUpdated {
                id: Uuid::new_v4(),
                provider_id: provider_id.to_string(),
                symbols_updated: updated,
                timestamp: Utc::now(),
            });
        }
    }

    /// Current averaged quote for a symbol, if one has been computed
    ///
    /// A missing symbol is not an error; it simply has no data yet.
    pub async fn query(&self, symbol: &str) -> Option<PriceQuote> {
        self.state.read().await.latest.get(symbol).cloned()
    }

    /// Snapshot of the whole latest-price table
    pub async fn all_prices(&self) -> HashMap<String, PriceQuote> {
        self.state.read().await.latest.clone()
    }

    /// Inbound REQUEST_PRICE operation
    ///
    /// A missing `symbol` parameter is the caller's error; an unknown symbol
    /// is answered with the "Not Yet Available" sentinel.
    pub async fn handle_request_price(
        &self,
        symbol: Option<&str>,
    ) -> Result<PriceReply, QueryError> {
        let symbol = symbol.ok_or(QueryError::MissingSymbol)?;
        match self.query(symbol).await.and_then(|quote| quote.value) {
            Some(value) => Ok(PriceReply::Price(value)),
            None => Ok(PriceReply::not_yet_available()),
        }
    }

    /// Triggers a fetch for one provider through the given transport
    ///
    /// Returns false for unknown providers and for dispatch failures; a
    /// false result is retried only on the scheduler's next tick.
    pub async fn trigger_fetch(&self, provider_id: &str, transport: &dyn FetchTransport) -> bool {
        match self.providers.get(provider_id) {
            Some(slot) => slot.provider.trigger_fetch(transport).await,
            None => {
                tracing::warn!(provider_id, "Cannot trigger fetch for unregistered provider");
                false
            }
        }
    }

    /// Ids of all registered providers
    pub fn provider_ids(&self) -> Vec<&'static str> {
        self.providers.keys().copied().collect()
    }

    /// Returns true if any registered provider contributes quotes for the symbol
    pub fn tracks_symbol(&self, symbol: &str) -> bool {
        self.providers
            .values()
            .any(|slot| slot.provider.tracks_symbol(symbol))
    }

    /// Subscribes to aggregation events
    pub fn subscribe(&self) -> broadcast::Receiver<AggregationEvent> {
        self.events.subscribe()
    }

    /// Ingest metrics for one provider, if registered
    pub async fn ingest_metrics(&self, provider_id: &str) -> Option<IngestMetrics> {
        match self.providers.get(provider_id) {
            Some(slot) => Some(slot.metrics.snapshot().await),
            None => None,
        }
    }

    fn emit(&self, event: AggregationEvent) {
        // Best effort: no subscribers is fine.
        let _ = self.events.send(event);
    }
}

impl Default for AggregationCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Merges a freshly averaged quote over the previous table entry
///
/// A field with zero qualifying samples this pass keeps its previous value;
/// it is never reset to zero or cleared.
fn merge_retaining(prev: Option<&PriceQuote>, mut fresh: PriceQuote) -> PriceQuote {
    if let Some(prev) = prev {
        if fresh.value.is_none() {
            fresh.value = prev.value;
        }
        if fresh.fee_high.is_none() {
            fresh.fee_high = prev.fee_high;
        }
        if fresh.fee_medium.is_none() {
            fresh.fee_medium = prev.fee_medium;
        }
        if fresh.fee_low.is_none() {
            fresh.fee_low = prev.fee_low;
        }
    }
    fresh
}
