//! Pricing provider implementations

pub mod exchange_rate;
pub mod fee_estimate;
pub mod scraping_rate;

pub use exchange_rate::ExchangeRateProvider;
pub use fee_estimate::FeeEstimateProvider;
pub use scraping_rate::ScrapingRateProvider;
