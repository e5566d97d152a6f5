//! Market-data clients for the pricewatch bot.
//!
//! This crate provides:
//! - The `QuoteProvider` trait used by registration and evaluation
//! - A LiveCoinWatch REST client (single quotes and coin listings)
//! - A Fear & Greed sentiment index client

pub mod error;
pub mod livecoinwatch;
pub mod provider;
pub mod sentiment;

pub use error::QuoteError;
pub use livecoinwatch::LiveCoinWatchClient;
pub use provider::QuoteProvider;
pub use sentiment::FearGreedClient;
