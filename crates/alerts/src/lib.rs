//! Price alert core for the pricewatch bot.
//!
//! This crate provides:
//! - SQL-backed storage of pending alerts
//! - Registration of new alerts against a live reference quote
//! - The recurring evaluator that checks prices, notifies and removes
//! - Telegram delivery of triggered notifications

pub mod evaluator;
pub mod notifier;
pub mod registrar;
pub mod store;
pub mod telegram;

pub use evaluator::{CycleOutcome, Evaluator, EvaluatorConfig};
pub use notifier::{format_price, format_triggered_message, Notifier, NotifyError};
pub use registrar::{RegisterError, Registrar};
pub use store::{AlertStore, StoreError};
pub use telegram::TelegramNotifier;
