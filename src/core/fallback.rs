//! Offline demo data used when the exchange-rate service can't be reached

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Currency codes offered when the live currency list is unavailable.
pub const FALLBACK_CURRENCIES: [&str; 12] = [
    "USD", "EUR", "GBP", "JPY", "CAD", "AUD", "CHF", "CNY", "RUB", "INR", "BRL", "MXN",
];

const DEMO_RATES: [(&str, &str, f64); 10] = [
    ("USD", "EUR", 0.93),
    ("EUR", "USD", 1.07),
    ("USD", "GBP", 0.79),
    ("GBP", "USD", 1.27),
    ("USD", "JPY", 149.0),
    ("JPY", "USD", 0.0067),
    ("USD", "RUB", 92.5),
    ("RUB", "USD", 0.0108),
    ("EUR", "RUB", 99.0),
    ("RUB", "EUR", 0.0101),
];

pub fn fallback_currencies() -> Vec<String> {
    FALLBACK_CURRENCIES.iter().map(|c| c.to_string()).collect()
}

/// One directed entry of a fallback table, as written in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackRate {
    pub from: String,
    pub to: String,
    pub rate: f64,
}

/// Directed `(from, to) -> rate` lookup. Pairs not in the table convert at 1.0.
#[derive(Debug, Clone)]
pub struct FallbackRates {
    rates: HashMap<(String, String), f64>,
}

impl FallbackRates {
    pub fn from_entries(entries: &[FallbackRate]) -> Self {
        let rates = entries
            .iter()
            .map(|e| ((e.from.to_uppercase(), e.to.to_uppercase()), e.rate))
            .collect();
        Self { rates }
    }

    /// Directed rate for a pair, matched case-insensitively. Unknown pairs
    /// convert at 1.0.
    pub fn rate(&self, from: &str, to: &str) -> f64 {
        self.rates
            .get(&(from.trim().to_uppercase(), to.trim().to_uppercase()))
            .copied()
            .unwrap_or(1.0)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl Default for FallbackRates {
    fn default() -> Self {
        let rates = DEMO_RATES
            .iter()
            .map(|(from, to, rate)| ((from.to_string(), to.to_string()), *rate))
            .collect();
        Self { rates }
    }
}
