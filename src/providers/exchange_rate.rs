//! Exchange-rate provider (CoinGecko /exchange_rates)

use crate::{
    constants::EXCHANGE_RATES_URL,
    error::DecodeError,
    provider::PricingProvider,
    transport::FetchTransport,
    types::{CoinCategory, FetchRequest, PriceQuote},
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// One entry of the `rates` map
#[derive(Debug, Deserialize)]
struct RateEntry {
    value: f64,
    #[serde(rename = "type")]
    category: String,
}

/// Provider decoding the CoinGecko exchange-rates payload
///
/// Payload shape:
/// `{"rates": {"<SYM>": {"value": <number>, "type": "crypto"|"fiat"|"commodity"}}}`.
/// The `type` string selects the category used for registry lookup.
pub struct ExchangeRateProvider {
    tracked: &'static [&'static str],
}

const TRACKED_SYMBOLS: &[&str] = &["BTC", "USD"];

impl ExchangeRateProvider {
    /// Creates the provider with its default tracked symbols
    pub fn new() -> Self {
        Self {
            tracked: TRACKED_SYMBOLS,
        }
    }
}

impl Default for ExchangeRateProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PricingProvider for ExchangeRateProvider {
    fn provider_id(&self) -> &'static str {
        "exchange-rate"
    }

    fn tracks_symbol(&self, symbol: &str) -> bool {
        self.tracked.contains(&symbol)
    }

    fn decode(&self, raw: &[u8]) -> Result<Vec<PriceQuote>, DecodeError> {
        let payload: Value = serde_json::from_slice(raw)?;
        let rates = payload
            .get("rates")
            .and_then(Value::as_object)
            .ok_or_else(|| DecodeError::UnexpectedShape("missing rates map".to_string()))?;

        let mut quotes = Vec::with_capacity(rates.len());
        for (symbol, entry) in rates {
            // One bad entry skips that entry only, never the whole payload.
            let entry: RateEntry = match serde_json::from_value(entry.clone()) {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(symbol = %symbol, error = %e, "Skipping malformed rate entry");
                    continue;
                }
            };
            let category = match CoinCategory::parse(&entry.category) {
                Some(c) => c,
                None => {
                    tracing::warn!(
                        symbol = %symbol,
                        category = %entry.category,
                        "Skipping rate entry with unknown category"
                    );
                    continue;
                }
            };
            quotes.push(PriceQuote::with_value(
                symbol.to_uppercase(),
                category,
                entry.value,
                self.provider_id(),
            ));
        }

        tracing::debug!(count = quotes.len(), "Decoded exchange-rate quotes");
        Ok(quotes)
    }

    async fn trigger_fetch(&self, transport: &dyn FetchTransport) -> bool {
        transport
            .dispatch(FetchRequest::new(self.provider_id(), EXCHANGE_RATES_URL))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_rates_payload() {
        let provider = ExchangeRateProvider::new();
        let raw = br#"{"rates": {
            "btc": {"value": 1.0, "type": "crypto", "name": "Bitcoin", "unit": "BTC"},
            "usd": {"value": 50000.0, "type": "fiat"},
            "xau": {"value": 26.1, "type": "commodity"}
        }}"#;
        let mut quotes = provider.decode(raw).unwrap();
        quotes.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        assert_eq!(quotes.len(), 3);
        assert_eq!(quotes[0].symbol, "BTC");
        assert_eq!(quotes[0].category, CoinCategory::Crypto);
        assert_eq!(quotes[0].value, Some(1.0));
        assert_eq!(quotes[1].symbol, "USD");
        assert_eq!(quotes[1].category, CoinCategory::Fiat);
        assert_eq!(quotes[2].category, CoinCategory::Commodity);
    }

    #[test]
    fn missing_rates_map_is_a_decode_error() {
        let provider = ExchangeRateProvider::new();
        let err = provider.decode(br#"{"gecko_says": "(V3) To the Moon!"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedShape(_)));
    }

    #[test]
    fn invalid_json_is_a_decode_error() {
        let provider = ExchangeRateProvider::new();
        let err = provider.decode(b"<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedJson(_)));
    }

    #[test]
    fn bad_entries_are_skipped_individually() {
        let provider = ExchangeRateProvider::new();
        let raw = br#"{"rates": {
            "btc": {"value": 1.0, "type": "crypto"},
            "usd": {"value": "fifty", "type": "fiat"},
            "xyz": {"value": 2.0, "type": "meme"}
        }}"#;
        let quotes = provider.decode(raw).unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].symbol, "BTC");
    }

    #[test]
    fn tracks_default_symbols() {
        let provider = ExchangeRateProvider::new();
        assert!(provider.tracks_symbol("BTC"));
        assert!(provider.tracks_symbol("USD"));
        assert!(!provider.tracks_symbol("LBP"));
    }

    #[tokio::test]
    async fn trigger_fetch_dispatches_one_request() {
        use crate::transport::ChannelTransport;

        let provider = ExchangeRateProvider::new();
        let (transport, mut rx) = ChannelTransport::new();
        assert!(provider.trigger_fetch(&transport).await);

        let request = rx.recv().await.unwrap();
        assert_eq!(request.provider_id, "exchange-rate");
        assert_eq!(request.url, EXCHANGE_RATES_URL);
    }
}
