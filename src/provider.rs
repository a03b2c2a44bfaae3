//! Provider abstraction for fetching and decoding external price sources

use crate::{error::DecodeError, transport::FetchTransport, types::PriceQuote};
use async_trait::async_trait;

/// Capability contract for a pricing data source
///
/// A provider knows which symbols it covers, how to ask the transport for a
/// fresh payload, and how to decode the raw response bytes into quotes. It
/// holds no state between cycles; the coordinator owns the window and table.
#[async_trait]
pub trait PricingProvider: Send + Sync {
    /// Stable id used to key registrations and attribute responses
    fn provider_id(&self) -> &'static str;

    /// Returns true if this provider contributes quotes for the symbol
    fn tracks_symbol(&self, symbol: &str) -> bool;

    /// Decodes a raw payload into quotes
    ///
    /// Malformed input is a [`DecodeError`] the caller catches, logs, and
    /// treats as zero quotes for the cycle; it never propagates further.
    fn decode(&self, raw: &[u8]) -> Result<Vec<PriceQuote>, DecodeError>;

    /// Hands fetch request(s) for this provider's host(s) to the transport
    ///
    /// Returns true iff at least one request was successfully dispatched.
    /// Fire-and-forget: the response arrives later as a separate ingest call.
    async fn trigger_fetch(&self, transport: &dyn FetchTransport) -> bool;
}
