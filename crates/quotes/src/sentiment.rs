//! Crypto Fear & Greed index client (alternative.me).

use crate::error::QuoteError;
use pricewatch_core::Sentiment;
use serde_json::Value;
use std::time::Duration;

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.alternative.me";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fear & Greed index client.
#[derive(Clone)]
pub struct FearGreedClient {
    http: reqwest::Client,
    base_url: String,
}

impl FearGreedClient {
    /// Create a client against the production endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom endpoint.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch the latest index reading.
    pub async fn fetch(&self) -> Result<Sentiment, QuoteError> {
        let url = format!("{}/fng/", self.base_url);
        let response = self
            .http
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QuoteError::Unavailable(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body = response.json::<Value>().await?;
        decode_sentiment(&body)
    }
}

impl Default for FearGreedClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode an `/fng/` response. The index value arrives as a string inside
/// `data[0]`; anything else is an unusable response.
fn decode_sentiment(body: &Value) -> Result<Sentiment, QuoteError> {
    let entry = body
        .get("data")
        .and_then(Value::as_array)
        .and_then(|data| data.first())
        .ok_or_else(|| QuoteError::Unavailable("missing data entry".to_string()))?;

    let value = entry
        .get("value")
        .and_then(Value::as_str)
        .and_then(|v| v.parse::<u8>().ok())
        .filter(|v| *v <= 100)
        .ok_or_else(|| QuoteError::Unavailable("malformed index value".to_string()))?;

    let classification = entry
        .get("value_classification")
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
        .to_string();

    Ok(Sentiment {
        value,
        classification,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_sentiment() {
        let body = json!({
            "data": [ { "value": "61", "value_classification": "Greed" } ]
        });

        let sentiment = decode_sentiment(&body).unwrap();
        assert_eq!(sentiment.value, 61);
        assert_eq!(sentiment.classification, "Greed");
    }

    #[test]
    fn test_decode_sentiment_malformed() {
        assert!(decode_sentiment(&json!({})).is_err());
        assert!(decode_sentiment(&json!({ "data": [] })).is_err());
        assert!(decode_sentiment(&json!({ "data": [ { "value": "lots" } ] })).is_err());
        assert!(decode_sentiment(&json!({ "data": [ { "value": "252" } ] })).is_err());
    }
}
