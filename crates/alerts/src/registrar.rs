//! Alert registration: validate against a live quote, then persist.

use crate::store::{AlertStore, StoreError};
use pricewatch_core::{normalize_symbol, Alert, Direction};
use pricewatch_quotes::{QuoteError, QuoteProvider};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RegisterError {
    /// The target did not parse as a usable real number.
    #[error("target price must be a real number")]
    InvalidTarget,
    /// The quote provider does not know the symbol.
    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),
    /// The quote provider could not produce a reference price right now.
    #[error("quote unavailable")]
    QuoteUnavailable(#[source] QuoteError),
    /// The alert could not be persisted.
    #[error("database error: {0}")]
    Store(#[from] StoreError),
}

/// Creates alerts. An alert is never persisted without a validated
/// reference price, because the direction is derived from it.
pub struct Registrar<P> {
    store: AlertStore,
    provider: Arc<P>,
}

impl<P: QuoteProvider> Registrar<P> {
    pub fn new(store: AlertStore, provider: Arc<P>) -> Self {
        Self { store, provider }
    }

    /// Register a new alert and return it, including its assigned id.
    ///
    /// No internal retries: a transient quote or store failure is returned
    /// to the caller, which owns the retry policy.
    pub async fn register(
        &self,
        owner_id: &str,
        chat_id: &str,
        symbol: &str,
        target: f64,
    ) -> Result<Alert, RegisterError> {
        if !target.is_finite() {
            return Err(RegisterError::InvalidTarget);
        }

        let symbol = normalize_symbol(symbol);
        if symbol.is_empty() {
            return Err(RegisterError::UnknownSymbol(symbol));
        }

        let quote = match self.provider.get_quote(&symbol).await {
            Ok(quote) => quote,
            Err(QuoteError::NotFound) => return Err(RegisterError::UnknownSymbol(symbol)),
            Err(err) => return Err(RegisterError::QuoteUnavailable(err)),
        };

        let direction = Direction::for_target(target, quote.price);
        let alert = self
            .store
            .insert(owner_id, chat_id, &symbol, target, direction)
            .await?;

        info!(
            id = alert.id,
            owner_id,
            symbol = %alert.symbol,
            target,
            direction = %alert.direction,
            reference_price = quote.price,
            "alert registered"
        );

        Ok(alert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pricewatch_core::Quote;
    use std::collections::HashMap;

    struct StaticProvider {
        prices: HashMap<String, f64>,
    }

    impl StaticProvider {
        fn with(pairs: &[(&str, f64)]) -> Arc<Self> {
            Arc::new(Self {
                prices: pairs
                    .iter()
                    .map(|(s, p)| (s.to_string(), *p))
                    .collect(),
            })
        }
    }

    #[async_trait]
    impl QuoteProvider for StaticProvider {
        async fn get_quote(&self, symbol: &str) -> Result<Quote, QuoteError> {
            self.prices
                .get(symbol)
                .map(|p| Quote::from_price(*p))
                .ok_or(QuoteError::NotFound)
        }
    }

    async fn store() -> AlertStore {
        AlertStore::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_register_derives_direction_from_reference_price() {
        let store = store().await;
        let registrar = Registrar::new(store.clone(), StaticProvider::with(&[("BTC", 49000.0)]));

        let above = registrar.register("7", "7", "btc", 50000.0).await.unwrap();
        assert_eq!(above.direction, Direction::Above);
        assert_eq!(above.symbol, "BTC");

        let below = registrar.register("7", "7", "BTC", 40000.0).await.unwrap();
        assert_eq!(below.direction, Direction::Below);

        // Target equal to the reference price waits for a rise.
        let equal = registrar.register("7", "7", "BTC", 49000.0).await.unwrap();
        assert_eq!(equal.direction, Direction::Above);

        assert_eq!(store.scan_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_register_rejects_non_finite_target() {
        let store = store().await;
        let registrar = Registrar::new(store.clone(), StaticProvider::with(&[("BTC", 49000.0)]));

        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = registrar.register("7", "7", "BTC", bad).await.unwrap_err();
            assert!(matches!(err, RegisterError::InvalidTarget));
        }

        assert!(store.scan_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_unknown_symbol_persists_nothing() {
        let store = store().await;
        let registrar = Registrar::new(store.clone(), StaticProvider::with(&[("BTC", 49000.0)]));

        let err = registrar
            .register("7", "7", "NOCOIN", 1.0)
            .await
            .unwrap_err();
        assert!(matches!(err, RegisterError::UnknownSymbol(s) if s == "NOCOIN"));
        assert!(store.scan_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_empty_symbol_skips_provider() {
        let store = store().await;
        let registrar = Registrar::new(store.clone(), StaticProvider::with(&[]));

        let err = registrar.register("7", "7", "   ", 1.0).await.unwrap_err();
        assert!(matches!(err, RegisterError::UnknownSymbol(_)));
    }
}
