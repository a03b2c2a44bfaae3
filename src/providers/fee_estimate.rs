//! BTC fee-estimate provider (mempool.space and mirrors)

use crate::{
    constants::FEE_ESTIMATE_URLS,
    error::DecodeError,
    provider::PricingProvider,
    transport::FetchTransport,
    types::{FetchRequest, PriceQuote},
};
use async_trait::async_trait;
use serde::Deserialize;

/// Recommended-fees payload, identical across all mirrors
#[derive(Debug, Deserialize)]
struct RecommendedFees {
    #[serde(rename = "fastestFee")]
    fastest_fee: f64,
    #[serde(rename = "halfHourFee")]
    half_hour_fee: f64,
    #[serde(rename = "hourFee")]
    hour_fee: f64,
}

/// Provider for BTC fee-market tiers, fetched from redundant mirrors
///
/// Each mirror serves the same payload shape; every mirror response that
/// arrives becomes its own ingest cycle, so the window averages across
/// mirrors as well as over time.
pub struct FeeEstimateProvider {
    mirrors: &'static [&'static str],
}

impl FeeEstimateProvider {
    /// Creates the provider with its default mirror set
    pub fn new() -> Self {
        Self {
            mirrors: FEE_ESTIMATE_URLS,
        }
    }
}

impl Default for FeeEstimateProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PricingProvider for FeeEstimateProvider {
    fn provider_id(&self) -> &'static str {
        "btc-fee"
    }

    fn tracks_symbol(&self, symbol: &str) -> bool {
        symbol == "BTC"
    }

    fn decode(&self, raw: &[u8]) -> Result<Vec<PriceQuote>, DecodeError> {
        let fees: RecommendedFees = serde_json::from_slice(raw)?;
        Ok(vec![PriceQuote::with_fees(
            "BTC",
            fees.fastest_fee,
            fees.half_hour_fee,
            fees.hour_fee,
            self.provider_id(),
        )])
    }

    /// Dispatches one request per mirror; success iff at least one was accepted
    async fn trigger_fetch(&self, transport: &dyn FetchTransport) -> bool {
        let mut any = false;
        for url in self.mirrors {
            if transport
                .dispatch(FetchRequest::new(self.provider_id(), *url))
                .await
            {
                any = true;
            } else {
                tracing::warn!(url = %url, "Fee-estimate mirror dispatch failed");
            }
        }
        any
    }
}
