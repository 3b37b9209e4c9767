//! Core business logic: currencies, conversion, ticker text and session state

pub mod cache;
pub mod config;
pub mod convert;
pub mod currency;
pub mod error;
pub mod log;
pub mod session;
pub mod ticker;

// Re-export main types for cleaner imports
pub use currency::{CurrencyCode, RateProvider, RateSnapshot};
pub use error::ConverterError;
pub use session::Session;
