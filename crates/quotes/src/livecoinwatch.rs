//! LiveCoinWatch REST API client.
//!
//! Uses the `POST /coins/single` endpoint for individual quotes and
//! `POST /coins/list` for the market-wide listing behind the top-movers
//! view. Authentication is an `x-api-key` header; all prices are in USD.

use crate::error::QuoteError;
use crate::provider::QuoteProvider;
use async_trait::async_trait;
use pricewatch_core::{normalize_symbol, CoinListing, Quote};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.livecoinwatch.com";

/// Deadline for a single API call. A timeout is reported as
/// `QuoteError::Timeout` and treated by callers like any unavailable quote.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How many coins to pull from the listing before ranking by 24h change.
const LISTING_FETCH_LIMIT: usize = 50;

/// LiveCoinWatch API client.
#[derive(Clone)]
pub struct LiveCoinWatchClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl LiveCoinWatchClient {
    /// Create a client against the production endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom endpoint.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    async fn post(&self, path: &str, payload: Value) -> Result<Value, QuoteError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .header("x-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QuoteError::Unavailable(format!(
                "HTTP {}",
                response.status()
            )));
        }

        Ok(response.json::<Value>().await?)
    }

    /// Top `count` coins of the market listing, ranked by 24h change.
    pub async fn top_movers(&self, count: usize) -> Result<Vec<CoinListing>, QuoteError> {
        let payload = serde_json::json!({
            "currency": "USD",
            "sort": "rank",
            "order": "ascending",
            "offset": 0,
            "limit": LISTING_FETCH_LIMIT,
            "meta": false,
        });

        let body = self.post("/coins/list", payload).await?;
        let mut listings = decode_listing(&body)?;
        rank_by_change(&mut listings);
        listings.truncate(count);
        Ok(listings)
    }
}

#[async_trait]
impl QuoteProvider for LiveCoinWatchClient {
    async fn get_quote(&self, symbol: &str) -> Result<Quote, QuoteError> {
        let code = normalize_symbol(symbol);
        let payload = serde_json::json!({
            "currency": "USD",
            "code": code,
            "meta": true,
        });

        let body = self.post("/coins/single", payload).await?;
        let quote = decode_quote(&body)?;
        debug!(symbol = %code, price = quote.price, "quote fetched");
        Ok(quote)
    }
}

/// Decode a `/coins/single` response into a quote.
///
/// `rate` is mandatory; the API reports unknown codes by omitting it (or
/// returning null), which maps to `NotFound`. The market fields stay
/// optional, missing or malformed values become `None` rather than zeros.
fn decode_quote(body: &Value) -> Result<Quote, QuoteError> {
    let price = body
        .get("rate")
        .and_then(Value::as_f64)
        .ok_or(QuoteError::NotFound)?;

    Ok(Quote {
        price,
        market_cap: body.get("cap").and_then(Value::as_f64),
        volume_24h: body.get("volume").and_then(Value::as_f64),
        change_24h_pct: body
            .get("delta")
            .and_then(|d| d.get("day"))
            .and_then(Value::as_f64),
    })
}

/// Decode a `/coins/list` response. Entries without a code or a rate are
/// skipped rather than failing the whole listing.
fn decode_listing(body: &Value) -> Result<Vec<CoinListing>, QuoteError> {
    let entries = body
        .as_array()
        .ok_or_else(|| QuoteError::Unavailable("listing is not an array".to_string()))?;

    let listings = entries
        .iter()
        .filter_map(|entry| {
            let code = entry.get("code")?.as_str()?.to_string();
            let price = entry.get("rate")?.as_f64()?;
            Some(CoinListing {
                code,
                price,
                change_24h_pct: entry
                    .get("delta")
                    .and_then(|d| d.get("day"))
                    .and_then(Value::as_f64),
            })
        })
        .collect();

    Ok(listings)
}

/// Order listings by 24h change, best performers first.
/// Entries with no reported change sort last.
fn rank_by_change(listings: &mut [CoinListing]) {
    listings.sort_by(|a, b| {
        let a = a.change_24h_pct.unwrap_or(f64::NEG_INFINITY);
        let b = b.change_24h_pct.unwrap_or(f64::NEG_INFINITY);
        b.partial_cmp(&a).unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_quote_full() {
        let body = json!({
            "rate": 49000.25,
            "cap": 960_000_000_000.0,
            "volume": 32_000_000_000.0,
            "delta": { "day": -1.84 }
        });

        let quote = decode_quote(&body).unwrap();
        assert_eq!(quote.price, 49000.25);
        assert_eq!(quote.market_cap, Some(960_000_000_000.0));
        assert_eq!(quote.volume_24h, Some(32_000_000_000.0));
        assert_eq!(quote.change_24h_pct, Some(-1.84));
    }

    #[test]
    fn test_decode_quote_missing_rate_is_not_found() {
        assert!(matches!(
            decode_quote(&json!({})),
            Err(QuoteError::NotFound)
        ));
        assert!(matches!(
            decode_quote(&json!({ "rate": null, "cap": 1.0 })),
            Err(QuoteError::NotFound)
        ));
    }

    #[test]
    fn test_decode_quote_partial_meta() {
        let body = json!({ "rate": 0.042, "delta": {} });
        let quote = decode_quote(&body).unwrap();
        assert_eq!(quote.price, 0.042);
        assert_eq!(quote.market_cap, None);
        assert_eq!(quote.change_24h_pct, None);
    }

    #[test]
    fn test_decode_listing_skips_malformed_entries() {
        let body = json!([
            { "code": "BTC", "rate": 49000.0, "delta": { "day": 2.1 } },
            { "code": "ETH" },
            { "rate": 1.0 },
            { "code": "SOL", "rate": 120.0, "delta": { "day": -3.4 } }
        ]);

        let listings = decode_listing(&body).unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].code, "BTC");
        assert_eq!(listings[1].code, "SOL");
    }

    #[test]
    fn test_decode_listing_rejects_non_array() {
        assert!(matches!(
            decode_listing(&json!({ "error": "nope" })),
            Err(QuoteError::Unavailable(_))
        ));
    }

    #[test]
    fn test_rank_by_change_best_first_missing_last() {
        let mut listings = vec![
            CoinListing { code: "A".to_string(), price: 1.0, change_24h_pct: Some(-2.0) },
            CoinListing { code: "B".to_string(), price: 1.0, change_24h_pct: None },
            CoinListing { code: "C".to_string(), price: 1.0, change_24h_pct: Some(5.5) },
        ];

        rank_by_change(&mut listings);
        let codes: Vec<&str> = listings.iter().map(|l| l.code.as_str()).collect();
        assert_eq!(codes, vec!["C", "A", "B"]);
    }
}
