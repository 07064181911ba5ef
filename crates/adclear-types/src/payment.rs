//! Inbound payment and attributed event records.

use serde::{Deserialize, Serialize};

use crate::{BannerId, CaseId, PaymentId, PublisherUuid, Result, TypeError, ZoneId};

/// An observed blockchain payment funding a batch of ad events.
///
/// Immutable once recorded; rows are never updated or deleted so the
/// payment table doubles as the audit trail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingPayment {
    /// Database identifier.
    pub id: PaymentId,
    /// Blockchain transaction reference, unique per payment.
    pub txid: String,
    /// Payment amount in smallest currency units.
    pub amount: u64,
    /// Sender account address.
    pub sender_address: String,
    /// Unix timestamp when the payment was observed.
    pub received_at: u64,
}

/// The kind of ad event an attributed value belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    View,
    Click,
}

impl EventType {
    /// Stable string form used in the database and in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::View => "view",
            EventType::Click => "click",
        }
    }

    /// Parse the stable string form.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "view" => Ok(EventType::View),
            "click" => Ok(EventType::Click),
            other => Err(TypeError::UnknownEventType(other.to_string())),
        }
    }
}

/// One attributed ad event within a payment batch, as delivered by the
/// upstream payment-ingestion component.
///
/// The settlement engine never invents event values; it only splits the
/// value reported here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaidEventDetail {
    /// Opaque identifier correlating to the served ad case.
    pub case_id: CaseId,
    /// View or click.
    pub event_type: EventType,
    /// Banner that was served.
    pub banner_id: BannerId,
    /// Zone the banner was served into.
    pub zone_id: ZoneId,
    /// Publisher owning the zone. May not correspond to a registered user.
    pub publisher_id: PublisherUuid,
    /// Gross attributed value in smallest currency units.
    pub event_value: u64,
}
