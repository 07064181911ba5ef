//! User directory query functions.

use rusqlite::Connection;

use adclear_types::{PublisherUuid, UserId};

use crate::{map_insert_err, DbError, Result};

/// Register a user. Returns the internal user id.
pub fn insert(
    conn: &Connection,
    uuid: &PublisherUuid,
    email: Option<&str>,
    created_at: u64,
) -> Result<UserId> {
    conn.execute(
        "INSERT INTO users (uuid, email, created_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![uuid.as_slice(), email, created_at as i64],
    )
    .map_err(|e| map_insert_err(e, "user uuid"))?;
    Ok(conn.last_insert_rowid())
}

/// Resolve a publisher identifier to an internal user id.
///
/// Returns `None` for publishers with no registered account — that is a
/// normal outcome (external publishers), not an error.
pub fn resolve_publisher(conn: &Connection, uuid: &PublisherUuid) -> Result<Option<UserId>> {
    let result = conn.query_row(
        "SELECT id FROM users WHERE uuid = ?1",
        [uuid.as_slice()],
        |row| row.get::<_, i64>(0),
    );
    match result {
        Ok(id) => Ok(Some(id)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(other) => Err(DbError::Sqlite(other)),
    }
}
