//! SQL schema definitions.

/// Complete schema for the settlement database v1.
///
/// The two uniqueness constraints are load-bearing: they are the
/// idempotence contract for payment reprocessing and ledger crediting.
pub const SCHEMA_V1: &str = r#"
-- ============================================================
-- Incoming payments (immutable audit trail)
-- ============================================================

CREATE TABLE IF NOT EXISTS incoming_payments (
    id INTEGER PRIMARY KEY,
    txid TEXT NOT NULL UNIQUE,
    amount INTEGER NOT NULL,
    sender_address TEXT NOT NULL,
    received_at INTEGER NOT NULL
);

-- ============================================================
-- User directory
-- ============================================================

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    uuid BLOB NOT NULL UNIQUE,
    email TEXT,
    created_at INTEGER NOT NULL
);

-- ============================================================
-- Payment distributions (one fee split per paid event)
-- ============================================================

CREATE TABLE IF NOT EXISTS payment_distributions (
    id INTEGER PRIMARY KEY,
    payment_id INTEGER NOT NULL REFERENCES incoming_payments(id),
    case_id BLOB NOT NULL,
    event_type TEXT NOT NULL,
    banner_id BLOB NOT NULL,
    zone_id BLOB NOT NULL,
    publisher_id BLOB NOT NULL,
    pay_time INTEGER NOT NULL,
    event_value INTEGER NOT NULL,
    license_fee INTEGER NOT NULL,
    operator_fee INTEGER NOT NULL,
    paid_amount INTEGER NOT NULL,
    exchange_rate REAL,
    paid_amount_currency INTEGER,
    UNIQUE (payment_id, case_id)
);

CREATE INDEX IF NOT EXISTS idx_distributions_payment ON payment_distributions(payment_id);
CREATE INDEX IF NOT EXISTS idx_distributions_publisher ON payment_distributions(publisher_id);

-- ============================================================
-- User ledger (append-only; balances are always derived)
-- ============================================================

CREATE TABLE IF NOT EXISTS user_ledger_entries (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id),
    amount INTEGER NOT NULL,
    entry_type INTEGER NOT NULL,
    status INTEGER NOT NULL,
    payment_id INTEGER REFERENCES incoming_payments(id),
    batch_ref TEXT,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_ledger_user ON user_ledger_entries(user_id);
CREATE UNIQUE INDEX IF NOT EXISTS idx_ledger_payment_once_per_user
    ON user_ledger_entries(user_id, payment_id)
    WHERE payment_id IS NOT NULL;
"#;
