//! Coin type registry
//!
//! Resolves a (category, symbol code) pair to a constructor producing a typed
//! averaged quote of the correct shape: crypto quotes carry fee tiers,
//! fiat and commodity quotes do not. The registry is populated once at
//! startup from a static list; supporting a new asset means adding an entry
//! here, never new control flow.

use crate::{
    averager::FieldMeans,
    error::RegistryError,
    types::{CoinCategory, PriceQuote},
};
use std::collections::HashMap;

/// Provider id recorded on averaged quotes in the latest-price table
pub const AGGREGATE_SOURCE: &str = "window-average";

/// Constructor producing a typed quote from a pass's field means
pub type QuoteCtor = fn(&'static str, &FieldMeans) -> PriceQuote;

/// Statically supported (category, symbol) pairs
const SUPPORTED: &[(CoinCategory, &str)] = &[
    (CoinCategory::Crypto, "BTC"),
    (CoinCategory::Crypto, "XMR"),
    (CoinCategory::Crypto, "ETH"),
    (CoinCategory::Crypto, "LTC"),
    (CoinCategory::Fiat, "USD"),
    (CoinCategory::Fiat, "EUR"),
    (CoinCategory::Fiat, "GBP"),
    (CoinCategory::Fiat, "LBP"),
    (CoinCategory::Commodity, "XAU"),
    (CoinCategory::Commodity, "XAG"),
];

fn crypto_quote(symbol: &'static str, means: &FieldMeans) -> PriceQuote {
    PriceQuote {
        symbol: symbol.to_string(),
        category: CoinCategory::Crypto,
        value: means.value,
        fee_high: means.fee_high,
        fee_medium: means.fee_medium,
        fee_low: means.fee_low,
        source_provider: AGGREGATE_SOURCE.to_string(),
    }
}

fn flat_quote(symbol: &'static str, category: CoinCategory, means: &FieldMeans) -> PriceQuote {
    PriceQuote {
        symbol: symbol.to_string(),
        category,
        value: means.value,
        fee_high: None,
        fee_medium: None,
        fee_low: None,
        source_provider: AGGREGATE_SOURCE.to_string(),
    }
}

fn fiat_quote(symbol: &'static str, means: &FieldMeans) -> PriceQuote {
    flat_quote(symbol, CoinCategory::Fiat, means)
}

fn commodity_quote(symbol: &'static str, means: &FieldMeans) -> PriceQuote {
    flat_quote(symbol, CoinCategory::Commodity, means)
}

/// Registry of constructible typed quotes
pub struct CoinTypeRegistry {
    ctors: HashMap<CoinCategory, HashMap<&'static str, QuoteCtor>>,
}

impl CoinTypeRegistry {
    /// Builds the registry from the static supported list
    pub fn new() -> Self {
        let mut ctors: HashMap<CoinCategory, HashMap<&'static str, QuoteCtor>> = HashMap::new();
        for &(category, symbol) in SUPPORTED {
            let ctor: QuoteCtor = match category {
                CoinCategory::Crypto => crypto_quote,
                CoinCategory::Fiat => fiat_quote,
                CoinCategory::Commodity => commodity_quote,
            };
            ctors.entry(category).or_default().insert(symbol, ctor);
        }
        Self { ctors }
    }

    /// Returns true if the (category, symbol) pair is supported
    pub fn supports(&self, category: CoinCategory, symbol: &str) -> bool {
        self.lookup(category, symbol).is_some()
    }

    /// Materializes a typed quote for the given symbol from a pass's means
    ///
    /// # Errors
    /// [`RegistryError::UnsupportedSymbol`] if no constructor is registered;
    /// the caller skips only that symbol and continues the pass.
    pub fn construct(
        &self,
        category: CoinCategory,
        symbol: &str,
        means: &FieldMeans,
    ) -> Result<PriceQuote, RegistryError> {
        let (canonical, ctor) = self
            .lookup(category, symbol)
            .ok_or_else(|| RegistryError::unsupported(category.as_str(), symbol))?;
        Ok(ctor(canonical, means))
    }

    fn lookup(&self, category: CoinCategory, symbol: &str) -> Option<(&'static str, QuoteCtor)> {
        self.ctors
            .get(&category)?
            .get_key_value(symbol)
            .map(|(canonical, ctor)| (*canonical, *ctor))
    }
}

impl Default for CoinTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn means(value: Option<f64>, fees: Option<(f64, f64, f64)>) -> FieldMeans {
        FieldMeans {
            value,
            fee_high: fees.map(|f| f.0),
            fee_medium: fees.map(|f| f.1),
            fee_low: fees.map(|f| f.2),
        }
    }

    #[test]
    fn constructs_crypto_quote_with_fees() {
        let registry = CoinTypeRegistry::new();
        let quote = registry
            .construct(
                CoinCategory::Crypto,
                "BTC",
                &means(Some(50000.0), Some((10.0, 5.0, 2.0))),
            )
            .unwrap();
        assert_eq!(quote.symbol, "BTC");
        assert_eq!(quote.category, CoinCategory::Crypto);
        assert_eq!(quote.value, Some(50000.0));
        assert_eq!(quote.fee_high, Some(10.0));
        assert_eq!(quote.fee_low, Some(2.0));
    }

    #[test]
    fn fiat_quote_never_carries_fees() {
        let registry = CoinTypeRegistry::new();
        let quote = registry
            .construct(
                CoinCategory::Fiat,
                "USD",
                &means(Some(1.0), Some((10.0, 5.0, 2.0))),
            )
            .unwrap();
        assert_eq!(quote.category, CoinCategory::Fiat);
        assert_eq!(quote.value, Some(1.0));
        assert_eq!(quote.fee_high, None);
        assert_eq!(quote.fee_medium, None);
        assert_eq!(quote.fee_low, None);
    }

    #[test]
    fn unsupported_symbol_is_an_error_not_a_panic() {
        let registry = CoinTypeRegistry::new();
        let err = registry
            .construct(CoinCategory::Crypto, "DOGE", &means(Some(0.1), None))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::unsupported("crypto", "DOGE")
        );
    }

    #[test]
    fn category_mismatch_is_unsupported() {
        let registry = CoinTypeRegistry::new();
        // BTC exists, but not as fiat.
        assert!(!registry.supports(CoinCategory::Fiat, "BTC"));
    }
}
