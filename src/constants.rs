//! Constants for the price aggregation engine
//!
//! All configuration for the aggregator is centralized here.
//! No runtime configuration (config.yml) is used - the system operates
//! transparently with these compile-time constants.

/// Length of the sliding sample window (in milliseconds)
///
/// Batches older than this relative to the current ingest are evicted and no
/// longer contribute to averages.
pub const PRICE_WINDOW_MS: i64 = 5 * 60 * 1000;

/// How often the host scheduler should trigger each provider (in milliseconds)
pub const PROVIDER_POLL_INTERVAL_MS: u64 = 5 * 60 * 1000;

/// Start delay for the exchange-rate provider (in milliseconds)
pub const EXCHANGE_RATE_START_DELAY_MS: u64 = 5 * 1000;

/// Start delay for the fee-estimate provider (in milliseconds)
pub const FEE_ESTIMATE_START_DELAY_MS: u64 = 10 * 1000;

/// Fallback transaction fee (sat/vbyte) for callers when no estimate is
/// available within the window.
///
/// Miner fees are normally 1-600 sat/vbyte; this is conservative to be safe.
/// The aggregator itself never substitutes this value.
pub const DEFAULT_TX_FEE: f64 = 150.0;

/// HTTP request timeout for the bundled transport (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Exchange-rate provider host
pub const EXCHANGE_RATES_URL: &str = "https://api.coingecko.com/api/v3/exchange_rates";

/// Scraping-rate provider host
pub const LIRA_RATE_URL: &str = "https://lirarate.com/";

/// Fee-estimate mirrors; any one delivering is sufficient
pub const FEE_ESTIMATE_URLS: &[&str] = &[
    "https://mempool.space/api/v1/fees/recommended",
    "https://mempool.emzy.de/api/v1/fees/recommended",
    "https://mempool.bisq.services/api/v1/fees/recommended",
];

/// User agent for HTTP requests
pub const USER_AGENT: &str = "price-aggregator-sdk/0.1.0";
