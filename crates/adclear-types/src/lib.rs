//! # adclear-types
//!
//! Shared domain types used across the adclear workspace: identifiers,
//! payment and event records, and the user ledger model.

pub mod distribution;
pub mod ledger;
pub mod payment;

/// Common identifier aliases.
///
/// Case, banner, zone and publisher identifiers are opaque 16-byte values
/// assigned by the ad-serving side; internal database identifiers are
/// signed 64-bit rowids.
pub type CaseId = [u8; 16];
pub type BannerId = [u8; 16];
pub type ZoneId = [u8; 16];
pub type PublisherUuid = [u8; 16];
pub type PaymentId = i64;
pub type UserId = i64;

/// Smallest currency units per whole token (1 token = 10^11 units).
pub const UNITS_PER_TOKEN: u64 = 100_000_000_000;

/// Error raised when decoding a persisted enum discriminant.
#[derive(Debug, thiserror::Error)]
pub enum TypeError {
    /// Unknown event type string.
    #[error("unknown event type: {0}")]
    UnknownEventType(String),

    /// Unknown ledger entry type code.
    #[error("unknown ledger entry type: {0}")]
    UnknownEntryType(i64),

    /// Unknown ledger entry status code.
    #[error("unknown ledger entry status: {0}")]
    UnknownEntryStatus(i64),
}

/// Convenience result type for type conversions.
pub type Result<T> = std::result::Result<T, TypeError>;
