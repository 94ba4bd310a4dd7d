use rusqlite::{Connection, Result};
use tracing::info;

/// Creates the key/value table backing every CMS record
///
/// Each row holds one JSON document under its storage key, matching the
/// layout the site editor persisted in browser local storage.
pub fn create_tables(conn: &Connection) -> Result<()> {
    info!("Creating database schema");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_entries (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        )",
        [],
    )?;

    info!("Database schema created successfully");
    Ok(())
}
