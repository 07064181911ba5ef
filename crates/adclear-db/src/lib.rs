//! # adclear-db
//!
//! SQLite persistence for the settlement engine: incoming payments,
//! per-event payment distributions, the append-only user ledger, and the
//! user directory.
//!
//! ## Schema
//!
//! - WAL mode mandatory
//! - Foreign keys enforced
//! - All timestamps are Unix epoch seconds
//! - Schema version stored in `PRAGMA user_version`
//!
//! Query functions take a plain [`rusqlite::Connection`] reference.
//! `rusqlite::Transaction` derefs to `Connection`, so callers that need
//! atomicity (the batch processor does) open their own transaction and
//! pass it in; the query layer never manages transaction boundaries
//! itself.

pub mod migrations;
pub mod queries;
pub mod schema;

use rusqlite::Connection;
use std::path::Path;

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Database error types.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint rejected the write. Settlement treats this
    /// as "already applied", not as a failure.
    #[error("duplicate: {0}")]
    Duplicate(String),

    #[error("decode error: {0}")]
    Decode(String),
}

impl From<adclear_types::TypeError> for DbError {
    fn from(e: adclear_types::TypeError) -> Self {
        DbError::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Open or create the settlement database at the given path.
///
/// Configures WAL mode, foreign keys, and runs any pending migrations.
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing).
pub fn open_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Configure SQLite pragmas.
fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;
         PRAGMA synchronous = NORMAL;",
    )?;
    Ok(())
}

/// Map an insert error, turning a uniqueness violation into
/// [`DbError::Duplicate`].
pub(crate) fn map_insert_err(e: rusqlite::Error, what: &str) -> DbError {
    if let rusqlite::Error::SqliteFailure(err, _) = &e {
        if err.code == rusqlite::ErrorCode::ConstraintViolation {
            return DbError::Duplicate(what.to_string());
        }
    }
    DbError::Sqlite(e)
}

/// Decode a 16-byte identifier column.
pub(crate) fn fixed16(value: Vec<u8>, column: &str) -> Result<[u8; 16]> {
    let len = value.len();
    value
        .try_into()
        .map_err(|_| DbError::Decode(format!("{column}: expected 16 bytes, got {len}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_memory() {
        let conn = open_memory().expect("open in-memory db");
        let version: u32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .expect("get user_version");
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let conn = open_memory().expect("open");
        let fk: i32 = conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .expect("get foreign_keys");
        assert_eq!(fk, 1);
    }

    #[test]
    fn test_fixed16() {
        assert_eq!(fixed16(vec![7u8; 16], "case_id").expect("decode"), [7u8; 16]);
        assert!(fixed16(vec![7u8; 15], "case_id").is_err());
    }
}
