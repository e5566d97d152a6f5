//! Market observations returned by quote providers.

use serde::{Deserialize, Serialize};

/// A single price observation for a symbol.
///
/// Only `price` is guaranteed; the market fields are present when the
/// provider returned them and `None` otherwise. A provider must never
/// substitute zero or a default for a missing price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Current price in USD.
    pub price: f64,
    /// Market capitalization in USD.
    pub market_cap: Option<f64>,
    /// Trading volume over the last 24 hours in USD.
    pub volume_24h: Option<f64>,
    /// Price change over the last 24 hours, in percent.
    pub change_24h_pct: Option<f64>,
}

impl Quote {
    /// A quote carrying only a price.
    pub fn from_price(price: f64) -> Self {
        Self {
            price,
            market_cap: None,
            volume_24h: None,
            change_24h_pct: None,
        }
    }
}

/// One entry of a market-wide coin listing, used for the top-movers view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinListing {
    /// Ticker symbol.
    pub code: String,
    /// Current price in USD.
    pub price: f64,
    /// Price change over the last 24 hours, in percent.
    pub change_24h_pct: Option<f64>,
}

/// Market sentiment reading (Fear & Greed index).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentiment {
    /// Index value, 0 (extreme fear) to 100 (extreme greed).
    pub value: u8,
    /// Human-readable classification reported with the value.
    pub classification: String,
}
