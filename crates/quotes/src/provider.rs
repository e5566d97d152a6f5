//! The quote provider seam between the core and external price APIs.

use crate::error::QuoteError;
use async_trait::async_trait;
use pricewatch_core::Quote;

/// Source of current prices for ticker symbols.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Fetch the current quote for a symbol.
    ///
    /// Must be safe to call concurrently for different symbols. A provider
    /// never fabricates a price: an unknown symbol is `NotFound`, a failed
    /// or malformed response is `Unavailable`.
    async fn get_quote(&self, symbol: &str) -> Result<Quote, QuoteError>;
}
