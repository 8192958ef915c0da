use rusqlite::{Connection, Result};

/// Initialize the SQLite database with the required schema.
/// This function is idempotent and can be safely called multiple times.
pub fn initialize_database(conn: &Connection) -> Result<()> {
    // seq gives pages a stable insertion order that survives updates
    conn.execute(
        "CREATE TABLE IF NOT EXISTS pages (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            page_name TEXT NOT NULL CHECK (length(trim(page_name)) > 0),
            title TEXT NOT NULL CHECK (length(trim(title)) > 0),
            content TEXT NOT NULL CHECK (length(trim(content)) > 0),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_pages_page_name ON pages(page_name)",
        [],
    )?;

    Ok(())
}
