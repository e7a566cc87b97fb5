use crate::error::StorageError;
use rusqlite::Connection;
use std::path::Path;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS p_finance (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    industry TEXT NOT NULL,
    business TEXT NOT NULL,
    items TEXT NOT NULL,
    cost TEXT NOT NULL CHECK (CAST(cost AS REAL) >= 0),
    note TEXT
)";

pub fn establish_connection(path: &Path) -> Result<Connection, StorageError> {
    let conn = Connection::open(path).map_err(StorageError::ConnectionFailed)?;
    conn.execute(SCHEMA, []).map_err(StorageError::ConnectionFailed)?;
    Ok(conn)
}

#[cfg(test)]
pub fn establish_test_connection() -> Result<Connection, StorageError> {
    let conn = Connection::open_in_memory().map_err(StorageError::ConnectionFailed)?;
    conn.execute(SCHEMA, []).map_err(StorageError::ConnectionFailed)?;
    Ok(conn)
}
