//! Exchange-rate service abstractions

use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Outcome of a live pair conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairConversion {
    pub result: f64,
    pub rate: Option<f64>,
}

/// A remote exchange-rate service. Implementations report transport errors,
/// bad statuses, malformed payloads and API-reported failures as `Err`.
#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// Latest rates of every supported currency relative to `base`.
    async fn latest_rates(&self, base: &str) -> Result<BTreeMap<String, f64>>;

    async fn convert_pair(&self, from: &str, to: &str, amount: f64) -> Result<PairConversion>;
}
