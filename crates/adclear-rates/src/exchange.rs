//! Exchange rate value and source.
//!
//! The exchange rate is advisory for settlement: fee splitting is pure
//! integer arithmetic and never depends on it. It is only used to record
//! reporting-currency equivalents alongside distribution rows, so a
//! failing source degrades bookkeeping but never blocks a batch.

use serde::{Deserialize, Serialize};

use crate::{RatesError, Result};

/// A point-in-time exchange rate between the smallest currency unit and a
/// reporting currency.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Unix timestamp the rate was quoted at.
    pub valid_at: u64,
    /// Reporting-currency value of one smallest unit.
    pub value: f64,
    /// ISO currency code, e.g. `"USD"`.
    pub currency: String,
}

impl ExchangeRate {
    /// Create a rate, rejecting non-positive or non-finite values.
    ///
    /// # Errors
    ///
    /// - [`RatesError::InvalidConfiguration`] if `value` is not a positive
    ///   finite number
    pub fn new(valid_at: u64, value: f64, currency: impl Into<String>) -> Result<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(RatesError::InvalidConfiguration(format!(
                "exchange rate must be positive and finite, got {value}"
            )));
        }
        Ok(Self {
            valid_at,
            value,
            currency: currency.into(),
        })
    }

    /// Convert an amount in smallest units to the reporting currency,
    /// rounding down.
    pub fn to_currency(&self, amount: u64) -> u64 {
        (amount as f64 * self.value).floor() as u64
    }
}

/// A read-only source of the current exchange rate.
pub trait ExchangeRateSource {
    /// Fetch the current rate.
    ///
    /// # Errors
    ///
    /// - [`RatesError::RateUnavailable`] if the source is unreachable or
    ///   has no quote
    fn fetch_exchange_rate(&self) -> Result<ExchangeRate>;
}

/// A fixed-rate source for development and tests.
#[derive(Debug, Clone, Default)]
pub struct StubExchangeRateSource {
    rate: Option<ExchangeRate>,
}

impl StubExchangeRateSource {
    /// A source that always returns the given rate.
    pub fn with_rate(rate: ExchangeRate) -> Self {
        Self { rate: Some(rate) }
    }

    /// A source that always fails with [`RatesError::RateUnavailable`].
    pub fn unavailable() -> Self {
        Self { rate: None }
    }
}

impl ExchangeRateSource for StubExchangeRateSource {
    fn fetch_exchange_rate(&self) -> Result<ExchangeRate> {
        self.rate
            .clone()
            .ok_or_else(|| RatesError::RateUnavailable("stub source has no rate".to_string()))
    }
}
