//! Error types for quote lookups.

use thiserror::Error;

/// Errors that can occur while fetching market data.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The provider does not know the requested symbol.
    #[error("symbol not found")]
    NotFound,

    /// The provider could not be reached or returned an unusable response.
    #[error("quote unavailable: {0}")]
    Unavailable(String),

    /// The request exceeded its deadline.
    #[error("request timed out")]
    Timeout,
}

impl QuoteError {
    /// Returns true if the same request is likely to succeed on retry.
    /// Unknown symbols stay unknown; everything else is worth retrying.
    pub fn is_transient(&self) -> bool {
        !matches!(self, QuoteError::NotFound)
    }
}

impl From<reqwest::Error> for QuoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            QuoteError::Timeout
        } else {
            QuoteError::Unavailable(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_transient() {
        assert!(!QuoteError::NotFound.is_transient());
        assert!(QuoteError::Unavailable("HTTP 502".to_string()).is_transient());
        assert!(QuoteError::Timeout.is_transient());
    }
}
