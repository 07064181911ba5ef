//! User ledger query functions — the ledger store.
//!
//! Entries are append-only. Balances are always `SUM()` aggregates over
//! accepted entries; nothing in this module (or anywhere else) updates an
//! amount in place. Callers needing multi-append atomicity wrap their
//! calls in a transaction; this module never opens one itself.

use rusqlite::Connection;

use adclear_types::ledger::{LedgerEntry, LedgerEntryStatus, LedgerEntryType};
use adclear_types::{PaymentId, UserId};

use crate::{map_insert_err, Result};

/// Input for one ledger entry.
#[derive(Debug, Clone)]
pub struct NewLedgerEntry {
    pub user_id: UserId,
    /// Signed amount; positive credits, negative debits.
    pub amount: i64,
    pub entry_type: LedgerEntryType,
    pub status: LedgerEntryStatus,
    /// Set for ad-income entries; with `user_id` it forms the idempotence
    /// key (at most one entry per user per payment).
    pub payment_id: Option<PaymentId>,
    /// External batch-withdrawal reference, for withdrawal entries.
    pub batch_ref: Option<String>,
    pub created_at: u64,
}

/// Append one immutable ledger entry. Returns the new row id.
///
/// # Errors
///
/// - [`crate::DbError::Duplicate`] if an entry for this
///   `(user_id, payment_id)` pair already exists
pub fn append(conn: &Connection, entry: &NewLedgerEntry) -> Result<i64> {
    conn.execute(
        "INSERT INTO user_ledger_entries
             (user_id, amount, entry_type, status, payment_id, batch_ref, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            entry.user_id,
            entry.amount,
            entry.entry_type.code(),
            entry.status.code(),
            entry.payment_id,
            entry.batch_ref,
            entry.created_at as i64,
        ],
    )
    .map_err(|e| map_insert_err(e, "ledger entry (user, payment)"))?;
    Ok(conn.last_insert_rowid())
}

/// Total balance: sum of all accepted entries for the user.
pub fn balance_for(conn: &Connection, user_id: UserId) -> Result<i64> {
    let balance: i64 = conn.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM user_ledger_entries
         WHERE user_id = ?1 AND status = ?2",
        rusqlite::params![user_id, LedgerEntryStatus::Accepted.code()],
        |row| row.get(0),
    )?;
    Ok(balance)
}

/// Wallet balance: accepted entries excluding the bonus category.
pub fn wallet_balance_for(conn: &Connection, user_id: UserId) -> Result<i64> {
    category_balance(conn, user_id, false)
}

/// Bonus balance: accepted entries of the bonus category only.
pub fn bonus_balance_for(conn: &Connection, user_id: UserId) -> Result<i64> {
    category_balance(conn, user_id, true)
}

fn category_balance(conn: &Connection, user_id: UserId, bonus: bool) -> Result<i64> {
    let sql = if bonus {
        "SELECT COALESCE(SUM(amount), 0) FROM user_ledger_entries
         WHERE user_id = ?1 AND status = ?2 AND entry_type IN (?3, ?4)"
    } else {
        "SELECT COALESCE(SUM(amount), 0) FROM user_ledger_entries
         WHERE user_id = ?1 AND status = ?2 AND entry_type NOT IN (?3, ?4)"
    };
    let balance: i64 = conn.query_row(
        sql,
        rusqlite::params![
            user_id,
            LedgerEntryStatus::Accepted.code(),
            LedgerEntryType::BonusIncome.code(),
            LedgerEntryType::BonusExpense.code(),
        ],
        |row| row.get(0),
    )?;
    Ok(balance)
}

/// Append an accepted bonus credit.
pub fn insert_bonus(conn: &Connection, user_id: UserId, amount: u64, created_at: u64) -> Result<i64> {
    append(
        conn,
        &NewLedgerEntry {
            user_id,
            amount: amount as i64,
            entry_type: LedgerEntryType::BonusIncome,
            status: LedgerEntryStatus::Accepted,
            payment_id: None,
            batch_ref: None,
            created_at,
        },
    )
}

/// Append an accepted withdrawal debit, optionally tagged with an external
/// batch-withdrawal reference.
pub fn insert_withdrawal(
    conn: &Connection,
    user_id: UserId,
    amount: u64,
    batch_ref: Option<&str>,
    created_at: u64,
) -> Result<i64> {
    append(
        conn,
        &NewLedgerEntry {
            user_id,
            amount: -(amount as i64),
            entry_type: LedgerEntryType::Withdrawal,
            status: LedgerEntryStatus::Accepted,
            payment_id: None,
            batch_ref: batch_ref.map(str::to_string),
            created_at,
        },
    )
}

/// List all entries for one user, oldest first.
pub fn entries_for_user(conn: &Connection, user_id: UserId) -> Result<Vec<LedgerEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, amount, entry_type, status, payment_id, batch_ref, created_at
         FROM user_ledger_entries WHERE user_id = ?1 ORDER BY id",
    )?;

    let raw = stmt
        .query_map([user_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, Option<i64>>(5)?,
                row.get::<_, Option<String>>(6)?,
                row.get::<_, i64>(7)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut entries = Vec::with_capacity(raw.len());
    for (id, user_id, amount, entry_type, status, payment_id, batch_ref, created_at) in raw {
        entries.push(LedgerEntry {
            id,
            user_id,
            amount,
            entry_type: LedgerEntryType::from_code(entry_type)?,
            status: LedgerEntryStatus::from_code(status)?,
            payment_id,
            batch_ref,
            created_at: created_at as u64,
        });
    }
    Ok(entries)
}
