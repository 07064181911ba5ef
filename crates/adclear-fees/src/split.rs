//! Exact three-way split of an event value.

use serde::{Deserialize, Serialize};

use crate::{FeeError, Result};

/// The result of splitting one event value.
///
/// Invariant: `license_fee + operator_fee + net_amount == event_value`
/// for the value the breakdown was computed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    /// Fee routed to the licensing entity.
    pub license_fee: u64,
    /// Fee retained by the operator.
    pub operator_fee: u64,
    /// Amount owed to the publisher.
    pub net_amount: u64,
}

/// Validate that a fee rate is a fraction in `[0, 1)`.
///
/// # Errors
///
/// - [`FeeError::InvalidRate`] if the rate is negative, not finite, or
///   `>= 1` (a rate of 1 would consume the entire value and starve the
///   remaining parties)
pub fn validate_rate(rate: f64) -> Result<()> {
    if !rate.is_finite() || rate < 0.0 || rate >= 1.0 {
        return Err(FeeError::InvalidRate { rate });
    }
    Ok(())
}

/// Split a gross event value into license fee, operator fee and net amount.
///
/// `license_fee = floor(license_rate * value)`; the operator fee is then
/// `floor(operator_rate * remainder)`. Flooring keeps each fee at or below
/// its configured rate, and the net amount picks up both remainders, so no
/// unit of currency is ever created or lost.
///
/// # Arguments
///
/// * `event_value` - Gross attributed value in smallest currency units
/// * `license_rate` - License fee fraction in `[0, 1)`
/// * `operator_rate` - Operator fee fraction in `[0, 1)`
///
/// # Errors
///
/// - [`FeeError::InvalidRate`] if either rate is outside `[0, 1)`
pub fn compute_fees(event_value: u64, license_rate: f64, operator_rate: f64) -> Result<FeeBreakdown> {
    validate_rate(license_rate)?;
    validate_rate(operator_rate)?;

    let license_fee = floor_fraction(event_value, license_rate);
    let remainder = event_value - license_fee;
    let operator_fee = floor_fraction(remainder, operator_rate);
    let net_amount = remainder - operator_fee;

    tracing::trace!(
        event_value,
        license_fee,
        operator_fee,
        net_amount,
        "computed fee split"
    );

    Ok(FeeBreakdown {
        license_fee,
        operator_fee,
        net_amount,
    })
}

/// `floor(rate * value)` with the rate already validated to `[0, 1)`.
///
/// The product of a `[0, 1)` rate and a `u64` value never exceeds the
/// value itself, so the cast back to `u64` cannot truncate above range.
fn floor_fraction(value: u64, rate: f64) -> u64 {
    (rate * value as f64).floor() as u64
}
