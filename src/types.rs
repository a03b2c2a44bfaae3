//! Types for the price aggregation engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of a quoted asset
///
/// A closed set: fee tiers are meaningful only for crypto assets, and the
/// variant (not a runtime type check) decides whether a quote carries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoinCategory {
    /// Cryptocurrency (carries fee-market tiers)
    Crypto,
    /// Fiat currency
    Fiat,
    /// Commodity
    Commodity,
}

impl CoinCategory {
    /// Parses a category from an untrusted provider string
    ///
    /// Anything other than the three known spellings is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "crypto" => Some(CoinCategory::Crypto),
            "fiat" => Some(CoinCategory::Fiat),
            "commodity" => Some(CoinCategory::Commodity),
            _ => None,
        }
    }

    /// Lowercase name, matching the wire spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            CoinCategory::Crypto => "crypto",
            CoinCategory::Fiat => "fiat",
            CoinCategory::Commodity => "commodity",
        }
    }
}

impl std::fmt::Display for CoinCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observation of a symbol's value and/or fee tiers from one provider
///
/// Quotes are created on decode, averaged within one aggregation pass, and
/// never individually persisted beyond the window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Uppercase asset/currency code (e.g. BTC, USD, LBP)
    pub symbol: String,

    /// Asset category
    pub category: CoinCategory,

    /// Price in the reference unit; None or non-positive means "no price data"
    pub value: Option<f64>,

    /// Fastest-confirmation fee tier (crypto only)
    pub fee_high: Option<f64>,

    /// Half-hour fee tier (crypto only)
    pub fee_medium: Option<f64>,

    /// One-hour fee tier (crypto only)
    pub fee_low: Option<f64>,

    /// Id of the provider this observation came from
    pub source_provider: String,
}

impl PriceQuote {
    /// Creates a value-only quote
    pub fn with_value(
        symbol: impl Into<String>,
        category: CoinCategory,
        value: f64,
        source_provider: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            category,
            value: Some(value),
            fee_high: None,
            fee_medium: None,
            fee_low: None,
            source_provider: source_provider.into(),
        }
    }

    /// Creates a fee-only crypto quote
    pub fn with_fees(
        symbol: impl Into<String>,
        fee_high: f64,
        fee_medium: f64,
        fee_low: f64,
        source_provider: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            category: CoinCategory::Crypto,
            value: None,
            fee_high: Some(fee_high),
            fee_medium: Some(fee_medium),
            fee_low: Some(fee_low),
            source_provider: source_provider.into(),
        }
    }
}

/// Outbound fetch request handed to the transport layer
///
/// The transport's eventual response must be re-delivered to
/// [`crate::aggregator::AggregationCoordinator::ingest`] with the same
/// provider id and the raw response bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Provider the response should be attributed to
    pub provider_id: String,
    /// Target host URL
    pub url: String,
}

impl FetchRequest {
    /// Creates a new fetch request
    pub fn new(provider_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            url: url.into(),
        }
    }
}

/// Raw response bytes re-entering the engine from the transport
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// Provider id carried over from the originating request
    pub provider_id: String,
    /// Raw response body
    pub body: Vec<u8>,
}

/// Reply payload for a price request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceReply {
    /// Current averaged price in the reference unit
    Price(f64),
    /// No averaged price yet for this symbol; serializes to "Not Yet Available"
    NotYetAvailable(String),
}

impl PriceReply {
    /// Sentinel for symbols with no data yet
    pub fn not_yet_available() -> Self {
        PriceReply::NotYetAvailable("Not Yet Available".to_string())
    }
}

/// Aggregation events for observers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregationEvent {
    /// An ingest pass updated the latest-price table
    PricesUpdated {
        id: Uuid,
        provider_id: String,
        symbols_updated: Vec<String>,
        timestamp: DateTime<Utc>,
    },

    /// A provider payload could not be decoded; the cycle contributed no quotes
    DecodeFailed {
        id: Uuid,
        provider_id: String,
        error_message: String,
        timestamp: DateTime<Utc>,
    },

    /// A symbol had no registry entry and was skipped for this pass
    SymbolSkipped {
        id: Uuid,
        symbol: String,
        timestamp: DateTime<Utc>,
    },
}

impl AggregationEvent {
    /// Get the event ID
    pub fn id(&self) -> Uuid {
        match self {
            AggregationEvent::PricesUpdated { id, .. } => *id,
            AggregationEvent::DecodeFailed { id, .. } => *id,
            AggregationEvent::SymbolSkipped { id, .. } => *id,
        }
    }
}

impl std::fmt::Display for AggregationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregationEvent::PricesUpdated {
                provider_id,
                symbols_updated,
                ..
            } => {
                write!(
                    f,
                    "Prices updated from {}: {} symbols",
                    provider_id,
                    symbols_updated.len()
                )
            }
            AggregationEvent::DecodeFailed {
                provider_id,
                error_message,
                ..
            } => {
                write!(f, "Decode failed for {}: {}", provider_id, error_message)
            }
            AggregationEvent::SymbolSkipped { symbol, .. } => {
                write!(f, "Symbol skipped: {}", symbol)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_categories() {
        assert_eq!(CoinCategory::parse("crypto"), Some(CoinCategory::Crypto));
        assert_eq!(CoinCategory::parse("fiat"), Some(CoinCategory::Fiat));
        assert_eq!(
            CoinCategory::parse("commodity"),
            Some(CoinCategory::Commodity)
        );
    }

    #[test]
    fn rejects_unknown_category_strings() {
        assert_eq!(CoinCategory::parse("Crypto"), None);
        assert_eq!(CoinCategory::parse("equity"), None);
        assert_eq!(CoinCategory::parse(""), None);
    }

    #[test]
    fn not_yet_available_serializes_to_sentinel() {
        let reply = PriceReply::not_yet_available();
        let json = serde_json::to_string(&reply).unwrap();
        assert_eq!(json, "\"Not Yet Available\"");
    }
}
