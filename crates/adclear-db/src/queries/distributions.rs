//! Payment distribution query functions.
//!
//! One row per settled `(payment, case)` pair; the unique constraint on
//! that pair is what makes batch reprocessing idempotent.

use rusqlite::Connection;

use adclear_types::distribution::PaymentDistribution;
use adclear_types::payment::{EventType, PaidEventDetail};
use adclear_types::{CaseId, PaymentId, PublisherUuid};

use crate::{fixed16, map_insert_err, Result};

/// Input for one distribution row.
#[derive(Debug)]
pub struct NewDistribution<'a> {
    pub payment_id: PaymentId,
    pub event: &'a PaidEventDetail,
    /// Timestamp of the settlement run.
    pub pay_time: u64,
    pub license_fee: u64,
    pub operator_fee: u64,
    pub paid_amount: u64,
    /// Exchange rate in force, when the rate source was reachable.
    pub exchange_rate: Option<f64>,
    /// `paid_amount` in the reporting currency, when the rate was available.
    pub paid_amount_currency: Option<u64>,
}

/// Insert one distribution row. Returns the new row id.
///
/// # Errors
///
/// - [`DbError::Duplicate`] if a row for `(payment_id, case_id)` already
///   exists
pub fn insert(conn: &Connection, d: &NewDistribution<'_>) -> Result<i64> {
    conn.execute(
        "INSERT INTO payment_distributions
             (payment_id, case_id, event_type, banner_id, zone_id, publisher_id,
              pay_time, event_value, license_fee, operator_fee, paid_amount,
              exchange_rate, paid_amount_currency)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        rusqlite::params![
            d.payment_id,
            d.event.case_id.as_slice(),
            d.event.event_type.as_str(),
            d.event.banner_id.as_slice(),
            d.event.zone_id.as_slice(),
            d.event.publisher_id.as_slice(),
            d.pay_time as i64,
            d.event.event_value as i64,
            d.license_fee as i64,
            d.operator_fee as i64,
            d.paid_amount as i64,
            d.exchange_rate,
            d.paid_amount_currency.map(|v| v as i64),
        ],
    )
    .map_err(|e| map_insert_err(e, "distribution (payment, case)"))?;
    Ok(conn.last_insert_rowid())
}

/// Whether a distribution already exists for the given payment and case.
pub fn exists(conn: &Connection, payment_id: PaymentId, case_id: &CaseId) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM payment_distributions WHERE payment_id = ?1 AND case_id = ?2",
        rusqlite::params![payment_id, case_id.as_slice()],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// List all distributions for one payment, in insertion order.
pub fn list_for_payment(conn: &Connection, payment_id: PaymentId) -> Result<Vec<PaymentDistribution>> {
    let mut stmt = conn.prepare(
        "SELECT id, payment_id, case_id, event_type, banner_id, zone_id, publisher_id,
                pay_time, event_value, license_fee, operator_fee, paid_amount,
                exchange_rate, paid_amount_currency
         FROM payment_distributions WHERE payment_id = ?1 ORDER BY id",
    )?;

    let raw = stmt
        .query_map([payment_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, Vec<u8>>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Vec<u8>>(4)?,
                row.get::<_, Vec<u8>>(5)?,
                row.get::<_, Vec<u8>>(6)?,
                row.get::<_, i64>(7)?,
                row.get::<_, i64>(8)?,
                row.get::<_, i64>(9)?,
                row.get::<_, i64>(10)?,
                row.get::<_, i64>(11)?,
                row.get::<_, Option<f64>>(12)?,
                row.get::<_, Option<i64>>(13)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut rows = Vec::with_capacity(raw.len());
    for (
        id,
        payment_id,
        case_id,
        event_type,
        banner_id,
        zone_id,
        publisher_id,
        pay_time,
        event_value,
        license_fee,
        operator_fee,
        paid_amount,
        exchange_rate,
        paid_amount_currency,
    ) in raw
    {
        rows.push(PaymentDistribution {
            id,
            payment_id,
            case_id: fixed16(case_id, "case_id")?,
            event_type: EventType::parse(&event_type)?,
            banner_id: fixed16(banner_id, "banner_id")?,
            zone_id: fixed16(zone_id, "zone_id")?,
            publisher_id: fixed16(publisher_id, "publisher_id")?,
            pay_time: pay_time as u64,
            event_value: event_value as u64,
            license_fee: license_fee as u64,
            operator_fee: operator_fee as u64,
            paid_amount: paid_amount as u64,
            exchange_rate,
            paid_amount_currency: paid_amount_currency.map(|v| v as u64),
        });
    }
    Ok(rows)
}

/// Sum of net paid amounts over all distributions of one payment.
pub fn sum_paid_amount(conn: &Connection, payment_id: PaymentId) -> Result<u64> {
    let sum: i64 = conn.query_row(
        "SELECT COALESCE(SUM(paid_amount), 0) FROM payment_distributions WHERE payment_id = ?1",
        [payment_id],
        |row| row.get(0),
    )?;
    Ok(sum as u64)
}

/// Net paid amount per publisher for one payment.
///
/// Ordered by publisher id so callers iterate deterministically.
pub fn net_by_publisher(
    conn: &Connection,
    payment_id: PaymentId,
) -> Result<Vec<(PublisherUuid, u64)>> {
    let mut stmt = conn.prepare(
        "SELECT publisher_id, SUM(paid_amount)
         FROM payment_distributions WHERE payment_id = ?1
         GROUP BY publisher_id ORDER BY publisher_id",
    )?;

    let raw = stmt
        .query_map([payment_id], |row| {
            Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut totals = Vec::with_capacity(raw.len());
    for (publisher, net) in raw {
        totals.push((fixed16(publisher, "publisher_id")?, net as u64));
    }
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::payments;
    use crate::DbError;

    fn test_db() -> Connection {
        crate::open_memory().expect("open test db")
    }

    fn event(case: u8, publisher: u8, value: u64) -> PaidEventDetail {
        PaidEventDetail {
            case_id: [case; 16],
            event_type: EventType::View,
            banner_id: [9u8; 16],
            zone_id: [8u8; 16],
            publisher_id: [publisher; 16],
            event_value: value,
        }
    }

    fn seed_payment(conn: &Connection) -> PaymentId {
        payments::insert(conn, "0001:00000001:0001", 10_000, "0001-00000001-8B4E", 0)
            .expect("payment")
    }

    fn new_dist<'a>(payment_id: PaymentId, ev: &'a PaidEventDetail) -> NewDistribution<'a> {
        NewDistribution {
            payment_id,
            event: ev,
            pay_time: 1_700_000_000,
            license_fee: 50,
            operator_fee: 49,
            paid_amount: ev.event_value - 99,
            exchange_rate: Some(1.0),
            paid_amount_currency: Some(ev.event_value - 99),
        }
    }

    #[test]
    fn test_insert_and_list() {
        let conn = test_db();
        let payment_id = seed_payment(&conn);
        let ev = event(1, 4, 5000);
        insert(&conn, &new_dist(payment_id, &ev)).expect("insert");

        let rows = list_for_payment(&conn, payment_id).expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].case_id, [1u8; 16]);
        assert_eq!(rows[0].event_value, 5000);
        assert_eq!(rows[0].paid_amount, 4901);
        assert!(rows[0].is_balanced());
    }

    #[test]
    fn test_duplicate_case_rejected() {
        let conn = test_db();
        let payment_id = seed_payment(&conn);
        let ev = event(1, 4, 5000);
        insert(&conn, &new_dist(payment_id, &ev)).expect("first");
        let result = insert(&conn, &new_dist(payment_id, &ev));
        assert!(matches!(result, Err(DbError::Duplicate(_))));
    }

    #[test]
    fn test_exists() {
        let conn = test_db();
        let payment_id = seed_payment(&conn);
        let ev = event(1, 4, 5000);
        assert!(!exists(&conn, payment_id, &ev.case_id).expect("exists"));
        insert(&conn, &new_dist(payment_id, &ev)).expect("insert");
        assert!(exists(&conn, payment_id, &ev.case_id).expect("exists"));
    }

    #[test]
    fn test_sums_and_grouping() {
        let conn = test_db();
        let payment_id = seed_payment(&conn);
        for (case, publisher) in [(1u8, 4u8), (2, 4), (3, 5)] {
            let ev = event(case, publisher, 5000);
            insert(&conn, &new_dist(payment_id, &ev)).expect("insert");
        }

        assert_eq!(sum_paid_amount(&conn, payment_id).expect("sum"), 3 * 4901);

        let per_publisher = net_by_publisher(&conn, payment_id).expect("group");
        assert_eq!(per_publisher.len(), 2);
        assert_eq!(per_publisher[0], ([4u8; 16], 2 * 4901));
        assert_eq!(per_publisher[1], ([5u8; 16], 4901));
    }

    #[test]
    fn test_null_currency_columns() {
        let conn = test_db();
        let payment_id = seed_payment(&conn);
        let ev = event(1, 4, 5000);
        let mut d = new_dist(payment_id, &ev);
        d.exchange_rate = None;
        d.paid_amount_currency = None;
        insert(&conn, &d).expect("insert");

        let rows = list_for_payment(&conn, payment_id).expect("list");
        assert_eq!(rows[0].exchange_rate, None);
        assert_eq!(rows[0].paid_amount_currency, None);
    }
}
