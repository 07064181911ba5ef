//! Incoming payment query functions.

use rusqlite::Connection;

use adclear_types::payment::IncomingPayment;
use adclear_types::PaymentId;

use crate::{map_insert_err, DbError, Result};

/// Record an observed blockchain payment. Returns the new row id.
///
/// The transaction id is unique; re-observing the same payment is a
/// [`DbError::Duplicate`].
pub fn insert(
    conn: &Connection,
    txid: &str,
    amount: u64,
    sender_address: &str,
    received_at: u64,
) -> Result<PaymentId> {
    conn.execute(
        "INSERT INTO incoming_payments (txid, amount, sender_address, received_at)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![txid, amount as i64, sender_address, received_at as i64],
    )
    .map_err(|e| map_insert_err(e, "payment txid"))?;
    Ok(conn.last_insert_rowid())
}

/// Get a payment by row id.
pub fn get(conn: &Connection, id: PaymentId) -> Result<IncomingPayment> {
    conn.query_row(
        "SELECT id, txid, amount, sender_address, received_at
         FROM incoming_payments WHERE id = ?1",
        [id],
        map_row,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("payment {id}")),
        other => DbError::Sqlite(other),
    })
}

/// Look up a payment by blockchain transaction id.
pub fn find_by_txid(conn: &Connection, txid: &str) -> Result<Option<IncomingPayment>> {
    let result = conn.query_row(
        "SELECT id, txid, amount, sender_address, received_at
         FROM incoming_payments WHERE txid = ?1",
        [txid],
        map_row,
    );
    match result {
        Ok(payment) => Ok(Some(payment)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(other) => Err(DbError::Sqlite(other)),
    }
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<IncomingPayment> {
    Ok(IncomingPayment {
        id: row.get(0)?,
        txid: row.get(1)?,
        amount: row.get::<_, i64>(2)? as u64,
        sender_address: row.get(3)?,
        received_at: row.get::<_, i64>(4)? as u64,
    })
}
