//! Error types for the price aggregation engine

use thiserror::Error;

/// Errors that can occur while decoding a raw provider payload
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Payload was not valid JSON
    #[error("Malformed JSON payload: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// Payload parsed but did not have the expected shape
    #[error("Unexpected payload shape: {0}")]
    UnexpectedShape(String),
}

/// Errors from the coin type registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No constructor registered for this (category, symbol) pair
    #[error("Unsupported symbol {symbol} in category {category}")]
    UnsupportedSymbol { category: String, symbol: String },
}

impl RegistryError {
    /// Creates an UnsupportedSymbol error
    pub fn unsupported(category: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self::UnsupportedSymbol {
            category: category.into(),
            symbol: symbol.into(),
        }
    }
}

/// Errors for inbound query operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The request did not carry the required symbol parameter
    #[error("symbol parameter required")]
    MissingSymbol,
}
