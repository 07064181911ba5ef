//! # adclear-rates
//!
//! External rate and configuration sources consumed by the settlement
//! engine: the exchange-rate feed, the license-fee registry, and local
//! operator configuration. The engine only sees the traits defined here;
//! the stub implementations back development and tests.
//!
//! ## Modules
//!
//! - [`exchange`] — Exchange rate value and source trait
//! - [`license`] — License fee source trait
//! - [`config`] — Operator configuration file and source trait

pub mod config;
pub mod exchange;
pub mod license;

pub use config::{OperatorConfigSource, SettlementConfig};
pub use exchange::{ExchangeRate, ExchangeRateSource, StubExchangeRateSource};
pub use license::{LicenseFeeSource, StubLicenseFeeSource};

/// Error types for rate and configuration lookups.
#[derive(Debug, thiserror::Error)]
pub enum RatesError {
    /// The exchange-rate source is unreachable or has no current rate.
    #[error("exchange rate unavailable: {0}")]
    RateUnavailable(String),

    /// A required configuration value is absent.
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    /// A configuration value is present but unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Convenience result type for rate operations.
pub type Result<T> = std::result::Result<T, RatesError>;
