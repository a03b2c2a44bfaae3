//! # Windowed Price Aggregation SDK
//!
//! Maintains a near-real-time estimate of asset prices and BTC fee tiers by
//! ingesting quotes from independent providers, retaining them in a sliding
//! time window, and averaging across providers and samples into one current
//! value per symbol.
//!
//! ## Usage
//!
//! The host owns the scheduling: it triggers provider fetches on its own
//! timers and feeds the transport's responses back into `ingest`.
//!
//! ```no_run
//! use std::sync::Arc;
//! use price_aggregator_sdk::{transport, AggregationCoordinator, HttpTransport};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let coordinator = Arc::new(AggregationCoordinator::new());
//! let (http, responses) = HttpTransport::new()?;
//!
//! // Responses re-enter as ingest calls.
//! tokio::spawn(transport::run_ingest_loop(coordinator.clone(), responses));
//!
//! // The host scheduler calls this per provider, per tick.
//! coordinator.trigger_fetch("exchange-rate", &http).await;
//!
//! // Later: read the current average.
//! if let Some(quote) = coordinator.query("BTC").await {
//!     println!("BTC: {:?}", quote.value);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! host scheduler -> trigger_fetch -> FetchTransport (fire-and-forget)
//!                                        |
//!                              FetchResponse (raw bytes)
//!                                        v
//! ingest -> decode -> evict -> insert -> average -> LatestPriceTable
//!                                                        ^
//!                                              query / REQUEST_PRICE
//! ```
//!
//! ## Error handling
//!
//! Nothing in this engine is fatal: malformed payloads, unknown provider
//! ids, and unsupported symbols are logged and isolated to the affected
//! provider, symbol, or cycle.

pub mod aggregator;
pub mod averager;
pub mod constants;
pub mod error;
pub mod metrics;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod transport;
pub mod types;
pub mod window;

// Re-export commonly used types
pub use aggregator::AggregationCoordinator;
pub use averager::{FieldMeans, SymbolAverager};
pub use error::{DecodeError, QueryError, RegistryError};
pub use metrics::IngestMetrics;
pub use provider::PricingProvider;
pub use registry::CoinTypeRegistry;
pub use transport::{ChannelTransport, FetchTransport, HttpTransport};
pub use types::{
    AggregationEvent, CoinCategory, FetchRequest, FetchResponse, PriceQuote, PriceReply,
};
pub use window::PriceSampleWindow;
