//! Schema and connection pragmas.

use rusqlite::Connection;

/// Apply pragmas to every pooled connection.
///
/// WAL lets readers proceed while a write is in progress; the busy timeout
/// makes concurrent writers wait on the lock instead of failing immediately.
pub fn apply_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
        "#,
    )
}

/// Create tables if they do not exist yet.
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            price       REAL NOT NULL,
            description TEXT NOT NULL
        );
        "#,
    )
}
