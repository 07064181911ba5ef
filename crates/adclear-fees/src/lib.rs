//! # adclear-fees
//!
//! Fee computation for event settlement.
//!
//! Every attributed event value is split three ways:
//!
//! - **License fee**: a fraction of the gross value, routed to the
//!   licensing entity.
//! - **Operator fee**: a fraction of what remains after the license fee.
//! - **Net amount**: the rest, credited to the publisher.
//!
//! Both fees round down, so the net amount absorbs the rounding remainder
//! and the three parts always sum exactly to the gross value. The
//! operator fee is deliberately computed on the post-license remainder
//! rather than the gross value; changing that compounding order changes
//! every payout and requires product sign-off.

pub mod split;

pub use split::{compute_fees, validate_rate, FeeBreakdown};

/// Error types for fee computation.
#[derive(Debug, thiserror::Error)]
pub enum FeeError {
    /// A fee rate is outside `[0, 1)`.
    #[error("fee rate {rate} is outside [0, 1)")]
    InvalidRate {
        /// The offending rate.
        rate: f64,
    },
}

/// Convenience result type for fee operations.
pub type Result<T> = std::result::Result<T, FeeError>;
