//! Core business logic abstractions

pub mod config;
pub mod error;
pub mod fetcher;
pub mod log;
pub mod rate;

// Re-export main types for cleaner imports
pub use error::RateError;
pub use fetcher::RateFetcher;
pub use rate::{
    Currency, CurrencyQuote, CurrencyRates, DateKey, DateRecord, DayCount, RateProvider, ResultSet,
};
