//! Core data types for the pricewatch bot.

pub mod alert;
pub mod quote;
pub mod symbol;

pub use alert::*;
pub use quote::*;
pub use symbol::*;
