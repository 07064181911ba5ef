//! Per-run settlement totals.

use serde::{Deserialize, Serialize};

/// Aggregate result of one settlement run.
///
/// Transient: returned to the caller for audit and reporting, never
/// persisted. Events skipped as already settled do not contribute to any
/// of the totals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementSummary {
    event_value_sum: u64,
    license_fee_sum: u64,
    processed_count: u64,
}

impl SettlementSummary {
    /// An empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// A summary whose license-fee accumulator starts at `fee_offset`.
    ///
    /// Used when one payment's event list is settled in successive
    /// chunks: each chunk is seeded with the previous chunk's license-fee
    /// partial sum so the final call reports the whole payment's total.
    pub fn seeded(fee_offset: u64) -> Self {
        Self {
            event_value_sum: 0,
            license_fee_sum: fee_offset,
            processed_count: 0,
        }
    }

    /// Record one settled event.
    pub fn record(&mut self, event_value: u64, license_fee: u64) {
        self.event_value_sum += event_value;
        self.license_fee_sum += license_fee;
        self.processed_count += 1;
    }

    /// Sum of gross event values settled this run.
    pub fn event_value_partial_sum(&self) -> u64 {
        self.event_value_sum
    }

    /// Running license-fee total, including any seed offset.
    pub fn license_fee_partial_sum(&self) -> u64 {
        self.license_fee_sum
    }

    /// Number of distribution rows written this run.
    pub fn processed_count(&self) -> u64 {
        self.processed_count
    }
}
