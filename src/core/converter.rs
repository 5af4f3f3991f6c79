//! Currency conversion with offline fallback
//!
//! Every operation here degrades instead of failing: when the remote service
//! can't be reached, or reports an error, the [`FallbackRates`] table is used
//! and the outcome is flagged as a demo value. Only invalid user input is
//! returned as an error.

use crate::core::currency::{ExchangeRateProvider, PairConversion};
use crate::core::error::ConvertError;
use crate::core::fallback::{FallbackRates, fallback_currencies};
use crate::core::record::ConversionRecord;
use crate::store::history::HistoryStore;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info};

const LIST_BASE_CURRENCY: &str = "USD";

/// Result of [`Converter::convert`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    pub result: f64,
    pub rate: Option<f64>,
    pub is_demo: bool,
}

/// Currency list returned by [`Converter::fetch_currencies`].
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyList {
    pub codes: Vec<String>,
    pub is_fallback: bool,
}

pub struct Converter {
    provider: Arc<dyn ExchangeRateProvider>,
    fallback: FallbackRates,
    history: HistoryStore,
    cached_rates: BTreeMap<String, f64>,
}

impl Converter {
    pub fn new(
        provider: Arc<dyn ExchangeRateProvider>,
        fallback: FallbackRates,
        history: HistoryStore,
    ) -> Self {
        Self {
            provider,
            fallback,
            history,
            cached_rates: BTreeMap::new(),
        }
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn clear_history(&mut self) {
        info!(count = self.history.len(), "Clearing conversion history");
        self.history.clear();
    }

    /// USD-based rate table from the last successful currency list fetch.
    pub fn cached_rates(&self) -> &BTreeMap<String, f64> {
        &self.cached_rates
    }

    /// Lists the currencies supported by the service, or the built-in list
    /// when the service is unavailable. Never empty.
    pub async fn fetch_currencies(&mut self) -> CurrencyList {
        match self.provider.latest_rates(LIST_BASE_CURRENCY).await {
            Ok(rates) if !rates.is_empty() => {
                let codes: Vec<String> = rates.keys().cloned().collect();
                info!("Loaded {} currencies", codes.len());
                self.cached_rates = rates;
                CurrencyList {
                    codes,
                    is_fallback: false,
                }
            }
            Ok(_) => {
                error!("Currency list fetch returned no currencies, using fallback list");
                self.fallback_currency_list()
            }
            Err(e) => {
                error!("Currency list fetch failed, using fallback list: {e:#}");
                self.fallback_currency_list()
            }
        }
    }

    fn fallback_currency_list(&self) -> CurrencyList {
        CurrencyList {
            codes: fallback_currencies(),
            is_fallback: true,
        }
    }

    /// Converts `amount` from one currency to another and records the
    /// conversion in the history. Codes are matched case-insensitively.
    /// Same-currency conversions return `amount` without a request and are
    /// not recorded.
    pub async fn convert(
        &mut self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<Conversion, ConvertError> {
        let (from, to) = validate_codes(from, to)?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ConvertError::InvalidAmount(amount));
        }

        if from == to {
            return Ok(Conversion {
                result: amount,
                rate: Some(1.0),
                is_demo: false,
            });
        }

        let conversion = match self.provider.convert_pair(&from, &to, amount).await {
            Ok(live) => {
                info!("Converted {} {} to {} {}", amount, from, live.result, to);
                Conversion {
                    result: live.result,
                    rate: live.rate,
                    is_demo: false,
                }
            }
            Err(e) => {
                error!(%from, %to, amount, "Conversion request failed, using demo rate: {e:#}");
                let rate = self.fallback.rate(&from, &to);
                let result = amount * rate;
                info!("Used demo conversion: {} {} to {} {}", amount, from, result, to);
                Conversion {
                    result,
                    rate: Some(rate),
                    is_demo: true,
                }
            }
        };

        // JSON has no encoding for inf/NaN, such a record would make the
        // whole history file unreadable
        if !conversion.result.is_finite() || !conversion.rate.is_none_or(f64::is_finite) {
            error!(%from, %to, amount, result = conversion.result, "Conversion result out of range");
            return Err(ConvertError::ResultOutOfRange { from, to, amount });
        }

        self.history.append(ConversionRecord::new(
            &from,
            &to,
            amount,
            conversion.result,
            conversion.rate,
            conversion.is_demo,
        ));
        Ok(conversion)
    }

    /// Current rate between two currencies. Issues its own request, so it may
    /// differ from the rate used by an earlier [`Converter::convert`]. Only
    /// missing codes are an error; service failures fall back to the demo table.
    pub async fn get_rate(&self, from: &str, to: &str) -> Result<f64, ConvertError> {
        let (from, to) = validate_codes(from, to)?;
        if from == to {
            return Ok(1.0);
        }

        let rate = match self.provider.convert_pair(&from, &to, 1.0).await {
            Ok(PairConversion {
                rate: Some(rate), ..
            }) if rate.is_finite() => rate,
            Ok(_) => {
                error!(%from, %to, "Rate missing from response, using demo rate");
                self.fallback.rate(&from, &to)
            }
            Err(e) => {
                error!(%from, %to, "Error getting exchange rate, using demo rate: {e:#}");
                self.fallback.rate(&from, &to)
            }
        };
        Ok(rate)
    }
}

/// Trims and uppercases both codes, rejecting empty ones.
fn validate_codes(from: &str, to: &str) -> Result<(String, String), ConvertError> {
    let from = from.trim().to_uppercase();
    if from.is_empty() {
        return Err(ConvertError::MissingCurrency("source"));
    }
    let to = to.trim().to_uppercase();
    if to.is_empty() {
        return Err(ConvertError::MissingCurrency("target"));
    }
    Ok((from, to))
}
