//! Persisted result of fee-splitting one paid event.

use serde::{Deserialize, Serialize};

use crate::payment::EventType;
use crate::{BannerId, CaseId, PaymentId, PublisherUuid, ZoneId};

/// The durable record of one fee split.
///
/// Invariant: `paid_amount + license_fee + operator_fee == event_value`
/// exactly, for every row. A row exists at most once per
/// `(payment_id, case_id)` pair; the database enforces this, which is what
/// makes payment reprocessing idempotent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentDistribution {
    /// Database identifier.
    pub id: i64,
    /// The payment this split was funded from.
    pub payment_id: PaymentId,
    /// The ad case the value was attributed to.
    pub case_id: CaseId,
    /// View or click.
    pub event_type: EventType,
    pub banner_id: BannerId,
    pub zone_id: ZoneId,
    /// Publisher owning the zone at event time.
    pub publisher_id: PublisherUuid,
    /// Unix timestamp of the settlement run that wrote this row.
    pub pay_time: u64,
    /// Gross attributed value in smallest units.
    pub event_value: u64,
    /// Fee routed to the licensing entity.
    pub license_fee: u64,
    /// Fee retained by the operator, computed on the post-license remainder.
    pub operator_fee: u64,
    /// Net amount owed to the publisher.
    pub paid_amount: u64,
    /// Exchange rate in force at settlement time, if the rate source was
    /// reachable.
    pub exchange_rate: Option<f64>,
    /// `paid_amount` converted to the reporting currency, if the rate was
    /// available.
    pub paid_amount_currency: Option<u64>,
}

impl PaymentDistribution {
    /// Check the exact-split invariant.
    pub fn is_balanced(&self) -> bool {
        self.paid_amount + self.license_fee + self.operator_fee == self.event_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PaymentDistribution {
        PaymentDistribution {
            id: 1,
            payment_id: 7,
            case_id: [1u8; 16],
            event_type: EventType::View,
            banner_id: [2u8; 16],
            zone_id: [3u8; 16],
            publisher_id: [4u8; 16],
            pay_time: 1_700_000_000,
            event_value: 5000,
            license_fee: 50,
            operator_fee: 49,
            paid_amount: 4901,
            exchange_rate: Some(1.0),
            paid_amount_currency: Some(4901),
        }
    }

    #[test]
    fn test_balanced() {
        assert!(sample().is_balanced());
    }

    #[test]
    fn test_unbalanced_detected() {
        let mut row = sample();
        row.operator_fee += 1;
        assert!(!row.is_balanced());
    }
}
