//! Core business logic abstractions

pub mod api_key;
pub mod config;
pub mod converter;
pub mod currency;
pub mod error;
pub mod fallback;
pub mod log;
pub mod record;

// Re-export main types for cleaner imports
pub use converter::{Conversion, Converter, CurrencyList};
pub use currency::{ExchangeRateProvider, PairConversion};
pub use error::ConvertError;
pub use record::ConversionRecord;
