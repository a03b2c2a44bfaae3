//! Scraping-rate provider (lirarate.com USD/LBP page)

use crate::{
    constants::LIRA_RATE_URL,
    error::DecodeError,
    provider::PricingProvider,
    transport::FetchTransport,
    types::{FetchRequest, PriceQuote},
};
use async_trait::async_trait;

/// Provider for the Lebanese pound street rate, scraped from raw markup
///
/// Fetching works; decoding does not yet. Extracting the USD/LBP rate from
/// the page markup is unimplemented, so every cycle contributes zero quotes.
/// The LBP entry in the latest-price table stays "Not Yet Available" until a
/// real parser lands here.
pub struct ScrapingRateProvider;

impl ScrapingRateProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ScrapingRateProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PricingProvider for ScrapingRateProvider {
    fn provider_id(&self) -> &'static str {
        "lira-rate"
    }

    fn tracks_symbol(&self, symbol: &str) -> bool {
        symbol == "LBP"
    }

    fn decode(&self, _raw: &[u8]) -> Result<Vec<PriceQuote>, DecodeError> {
        // TODO: scrape USD/LBP from the HTML payload
        tracing::debug!("LBP markup decoding not implemented; cycle yields no quotes");
        Ok(Vec::new())
    }

    async fn trigger_fetch(&self, transport: &dyn FetchTransport) -> bool {
        transport
            .dispatch(FetchRequest::new(self.provider_id(), LIRA_RATE_URL))
            .await
    }
}
