//! The recurring alert evaluation cycle.
//!
//! Each cycle snapshots the store, fetches one quote per distinct symbol,
//! evaluates every alert against the price its symbol got this cycle, and
//! for each crossing notifies the owner and removes the alert. The
//! evaluator keeps no state between cycles; everything durable lives in
//! the store.

use crate::notifier::{format_triggered_message, Notifier};
use crate::store::{AlertStore, StoreError};
use pricewatch_quotes::QuoteProvider;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Evaluator scheduling parameters.
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    /// Time between evaluation cycles.
    pub interval: Duration,
    /// Delay before the first cycle, so startup can finish first.
    pub initial_delay: Duration,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(120),
            initial_delay: Duration::from_secs(15),
        }
    }
}

/// Summary of one evaluation cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleOutcome {
    /// Alerts in the snapshot.
    pub scanned: usize,
    /// Alerts whose symbol had an available quote this cycle.
    pub evaluated: usize,
    /// Alerts that crossed their threshold and were removed.
    pub triggered: usize,
}

/// Recurring price-threshold evaluator.
pub struct Evaluator<P, N> {
    store: AlertStore,
    provider: Arc<P>,
    notifier: Arc<N>,
    config: EvaluatorConfig,
}

impl<P: QuoteProvider, N: Notifier> Evaluator<P, N> {
    pub fn new(
        store: AlertStore,
        provider: Arc<P>,
        notifier: Arc<N>,
        config: EvaluatorConfig,
    ) -> Self {
        Self {
            store,
            provider,
            notifier,
            config,
        }
    }

    /// Drive cycles forever. Runs as a single task, so cycles cannot
    /// overlap: the next tick is not taken before the previous cycle
    /// finishes.
    pub async fn run(self) {
        let first = tokio::time::Instant::now() + self.config.initial_delay;
        let mut ticks = tokio::time::interval_at(first, self.config.interval);
        ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        info!(
            interval_secs = self.config.interval.as_secs(),
            "alert evaluator started"
        );

        loop {
            ticks.tick().await;
            match self.run_cycle().await {
                Ok(outcome) if outcome.triggered > 0 => {
                    info!(
                        scanned = outcome.scanned,
                        evaluated = outcome.evaluated,
                        triggered = outcome.triggered,
                        "evaluation cycle complete"
                    );
                }
                Ok(outcome) => {
                    debug!(
                        scanned = outcome.scanned,
                        evaluated = outcome.evaluated,
                        "evaluation cycle complete"
                    );
                }
                // Fail-closed: nothing was evaluated or deleted, the next
                // tick retries from a fresh snapshot.
                Err(err) => warn!(error = %err, "evaluation cycle aborted"),
            }
        }
    }

    /// Run a single evaluation cycle over the current store snapshot.
    pub async fn run_cycle(&self) -> Result<CycleOutcome, StoreError> {
        let alerts = self.store.scan_all().await?;
        if alerts.is_empty() {
            return Ok(CycleOutcome::default());
        }

        // One provider call per distinct symbol, however many alerts
        // share it.
        let symbols: BTreeSet<&str> = alerts.iter().map(|a| a.symbol.as_str()).collect();

        let mut prices: HashMap<String, f64> = HashMap::new();
        for symbol in symbols {
            match self.provider.get_quote(symbol).await {
                Ok(quote) => {
                    prices.insert(symbol.to_string(), quote.price);
                }
                // Alerts on this symbol stay pending and are retried
                // next cycle.
                Err(err) => {
                    debug!(symbol, error = %err, "quote unavailable, alerts deferred");
                }
            }
        }

        let mut outcome = CycleOutcome {
            scanned: alerts.len(),
            ..Default::default()
        };

        for alert in alerts {
            let Some(&price) = prices.get(&alert.symbol) else {
                continue;
            };
            outcome.evaluated += 1;

            if !alert.is_hit(price) {
                continue;
            }

            // At-most-once notify, exactly-once remove: the deletion is
            // not gated on delivery.
            let text = format_triggered_message(&alert, price);
            if let Err(err) = self.notifier.send(&alert.chat_id, &text).await {
                warn!(
                    id = alert.id,
                    chat_id = %alert.chat_id,
                    error = %err,
                    "notification failed, alert removed anyway"
                );
            }

            if let Err(err) = self.store.delete_by_id(alert.id).await {
                // The owner was already notified; leave the stale row for
                // manual reconciliation instead of re-notifying forever.
                error!(id = alert.id, error = %err, "failed to delete triggered alert");
            }

            outcome.triggered += 1;
        }

        Ok(outcome)
    }
}
