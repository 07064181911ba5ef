//! # adclear-settle
//!
//! The payment batch processor: takes an observed blockchain payment plus
//! the list of ad events it funds, splits every event value into license
//! fee, operator fee and publisher net, and credits publisher ledgers.
//!
//! Settlement is two independent, individually idempotent phases:
//!
//! 1. [`PaymentProcessor::process_paid_events`] — one transaction that
//!    writes a distribution row per event and returns a
//!    [`SettlementSummary`].
//! 2. [`PaymentProcessor::add_ad_income_to_user_ledger`] — one
//!    transaction that aggregates net amounts per publisher and appends
//!    one ad-income ledger entry per registered user.
//!
//! Either phase can be retried from the top after a crash; database
//! uniqueness constraints turn redelivered work into no-ops.
//!
//! ## Modules
//!
//! - [`processor`] — The two-phase batch processor
//! - [`summary`] — Per-run settlement totals

pub mod processor;
pub mod summary;

pub use processor::PaymentProcessor;
pub use summary::SettlementSummary;

/// Error types for settlement operations.
#[derive(Debug, thiserror::Error)]
pub enum SettleError {
    /// A required rate or configuration value could not be obtained.
    /// Raised before any write; retry once configuration is fixed.
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    /// A configured fee rate is invalid.
    #[error(transparent)]
    Fee(#[from] adclear_fees::FeeError),

    /// Persistence failure; the enclosing transaction was rolled back.
    #[error(transparent)]
    Db(#[from] adclear_db::DbError),
}

/// Convenience result type for settlement operations.
pub type Result<T> = std::result::Result<T, SettleError>;
