//! Cross-provider symbol averaging
//!
//! Groups the retained window quotes by symbol and computes per-field
//! arithmetic means. Each field is averaged independently over the samples
//! where it is present and strictly positive, so a missing or non-positive
//! sample never drags a mean toward zero and an all-missing field never
//! divides by zero.

use crate::types::{CoinCategory, PriceQuote};
use std::collections::HashMap;

/// Per-symbol means computed in one aggregation pass
///
/// `None` means the field had zero qualifying samples this pass and must not
/// be treated as zero; the previous table value is retained instead.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldMeans {
    pub value: Option<f64>,
    pub fee_high: Option<f64>,
    pub fee_medium: Option<f64>,
    pub fee_low: Option<f64>,
}

/// Running sum and count for one field
#[derive(Debug, Default)]
struct FieldAccumulator {
    sum: f64,
    count: u32,
}

impl FieldAccumulator {
    /// Folds in a sample if it is present and strictly positive
    fn observe(&mut self, sample: Option<f64>) {
        if let Some(v) = sample {
            if v > 0.0 {
                self.sum += v;
                self.count += 1;
            }
        }
    }

    fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

/// Computes per-symbol field means over a set of quotes
pub struct SymbolAverager;

impl SymbolAverager {
    /// Groups quotes by symbol, preserving the category observed per group
    pub fn group_by_symbol<'a>(
        quotes: impl Iterator<Item = &'a PriceQuote>,
    ) -> HashMap<String, Vec<&'a PriceQuote>> {
        let mut grouped: HashMap<String, Vec<&'a PriceQuote>> = HashMap::new();
        for quote in quotes {
            grouped.entry(quote.symbol.clone()).or_default().push(quote);
        }
        grouped
    }

    /// Averages one symbol group field by field
    pub fn average(group: &[&PriceQuote]) -> FieldMeans {
        let mut value = FieldAccumulator::default();
        let mut fee_high = FieldAccumulator::default();
        let mut fee_medium = FieldAccumulator::default();
        let mut fee_low = FieldAccumulator::default();

        for quote in group {
            value.observe(quote.value);
            // Fee tiers only exist on crypto quotes; the variant decides.
            if quote.category == CoinCategory::Crypto {
                fee_high.observe(quote.fee_high);
                fee_medium.observe(quote.fee_medium);
                fee_low.observe(quote.fee_low);
            }
        }

        FieldMeans {
            value: value.mean(),
            fee_high: fee_high.mean(),
            fee_medium: fee_medium.mean(),
            fee_low: fee_low.mean(),
        }
    }

    /// Full pass: groups and averages, yielding category and means per symbol
    ///
    /// The category of a group is the category its quotes were decoded with;
    /// providers are expected to be consistent per symbol, so the first
    /// quote's category stands for the group.
    pub fn averages<'a>(
        quotes: impl Iterator<Item = &'a PriceQuote>,
    ) -> HashMap<String, (CoinCategory, FieldMeans)> {
        Self::group_by_symbol(quotes)
            .into_iter()
            .map(|(symbol, group)| {
                let category = group[0].category;
                let means = Self::average(&group);
                (symbol, (category, means))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_quote(symbol: &str, value: f64) -> PriceQuote {
        PriceQuote::with_value(symbol, CoinCategory::Crypto, value, "test")
    }

    #[test]
    fn mean_over_positive_values() {
        let quotes = vec![
            value_quote("BTC", 50_000.0),
            value_quote("BTC", 51_000.0),
            value_quote("BTC", 52_000.0),
        ];
        let refs: Vec<&PriceQuote> = quotes.iter().collect();
        let means = SymbolAverager::average(&refs);
        assert_eq!(means.value, Some(51_000.0));
    }

    #[test]
    fn non_positive_values_excluded_from_sum_and_count() {
        let quotes = vec![
            value_quote("BTC", 100.0),
            value_quote("BTC", 0.0),
            value_quote("BTC", -5.0),
            value_quote("BTC", 200.0),
        ];
        let refs: Vec<&PriceQuote> = quotes.iter().collect();
        let means = SymbolAverager::average(&refs);
        // 0.0 and -5.0 contribute to neither numerator nor denominator.
        assert_eq!(means.value, Some(150.0));
    }

    #[test]
    fn zero_qualifying_samples_yields_none_not_zero() {
        let quotes = vec![value_quote("BTC", 0.0), value_quote("BTC", -1.0)];
        let refs: Vec<&PriceQuote> = quotes.iter().collect();
        let means = SymbolAverager::average(&refs);
        assert_eq!(means.value, None);
        assert_eq!(means.fee_high, None);
    }

    #[test]
    fn fields_averaged_independently() {
        let quotes = vec![
            PriceQuote::with_fees("BTC", 10.0, 5.0, 2.0, "a"),
            PriceQuote::with_value("BTC", CoinCategory::Crypto, 50_000.0, "b"),
        ];
        let refs: Vec<&PriceQuote> = quotes.iter().collect();
        let means = SymbolAverager::average(&refs);
        // Value mean over one sample, fee means over the other.
        assert_eq!(means.value, Some(50_000.0));
        assert_eq!(means.fee_high, Some(10.0));
        assert_eq!(means.fee_medium, Some(5.0));
        assert_eq!(means.fee_low, Some(2.0));
    }

    #[test]
    fn fee_fields_on_non_crypto_quotes_ignored() {
        let mut odd = PriceQuote::with_value("USD", CoinCategory::Fiat, 1.0, "a");
        odd.fee_high = Some(99.0);
        let refs = vec![&odd];
        let means = SymbolAverager::average(&refs);
        assert_eq!(means.value, Some(1.0));
        assert_eq!(means.fee_high, None);
    }

    #[test]
    fn groups_symbols_independently() {
        let quotes = vec![
            value_quote("BTC", 100.0),
            PriceQuote::with_value("USD", CoinCategory::Fiat, 1.0, "a"),
            value_quote("BTC", 200.0),
        ];
        let all = SymbolAverager::averages(quotes.iter());
        assert_eq!(all.len(), 2);
        assert_eq!(all["BTC"].1.value, Some(150.0));
        assert_eq!(all["USD"].0, CoinCategory::Fiat);
        assert_eq!(all["USD"].1.value, Some(1.0));
    }
}
