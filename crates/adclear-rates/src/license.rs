//! License fee source.

use crate::{RatesError, Result};

/// A read-only source of the platform license terms.
///
/// The fee rate and payout address come from the licensing registry;
/// neither has a silent default. A source that cannot produce them fails
/// with [`RatesError::MissingConfiguration`], which the settlement engine
/// surfaces before writing anything.
pub trait LicenseFeeSource {
    /// The license fee rate as a fraction in `[0, 1)`.
    ///
    /// # Errors
    ///
    /// - [`RatesError::MissingConfiguration`] if no license fee is
    ///   configured
    fn fee(&self) -> Result<f64>;

    /// The account the license fee is payable to.
    ///
    /// # Errors
    ///
    /// - [`RatesError::MissingConfiguration`] if no license account is
    ///   configured
    fn address(&self) -> Result<String>;
}

/// A fixed license source for development and tests.
#[derive(Debug, Clone, Default)]
pub struct StubLicenseFeeSource {
    fee: Option<f64>,
    address: Option<String>,
}

impl StubLicenseFeeSource {
    /// A source with the given fee and payout address.
    pub fn new(fee: f64, address: impl Into<String>) -> Self {
        Self {
            fee: Some(fee),
            address: Some(address.into()),
        }
    }

    /// A source with no license configured; every call fails.
    pub fn unconfigured() -> Self {
        Self {
            fee: None,
            address: None,
        }
    }
}

impl LicenseFeeSource for StubLicenseFeeSource {
    fn fee(&self) -> Result<f64> {
        self.fee
            .ok_or_else(|| RatesError::MissingConfiguration("license fee".to_string()))
    }

    fn address(&self) -> Result<String> {
        self.address
            .clone()
            .ok_or_else(|| RatesError::MissingConfiguration("license address".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_stub() {
        let source = StubLicenseFeeSource::new(0.01, "0001-00000000-9B6F");
        assert_eq!(source.fee().expect("fee"), 0.01);
        assert_eq!(source.address().expect("address"), "0001-00000000-9B6F");
    }

    #[test]
    fn test_unconfigured_stub_fails() {
        let source = StubLicenseFeeSource::unconfigured();
        assert!(matches!(
            source.fee(),
            Err(RatesError::MissingConfiguration(_))
        ));
        assert!(matches!(
            source.address(),
            Err(RatesError::MissingConfiguration(_))
        ));
    }
}
