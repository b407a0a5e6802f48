use rusqlite::Connection;

pub fn migrate(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS stat_cache (
            source_id   TEXT NOT NULL,
            dataset     TEXT NOT NULL,
            rows_json   TEXT NOT NULL,
            fetched_at  TEXT NOT NULL,
            PRIMARY KEY (source_id, dataset)
        );

        CREATE TABLE IF NOT EXISTS variable_labels (
            source_id   TEXT NOT NULL,
            dataset     TEXT NOT NULL,
            label       TEXT NOT NULL,
            PRIMARY KEY (source_id, dataset)
        );

        CREATE TABLE IF NOT EXISTS codes (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            code        TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_codes_created ON codes(created_at DESC);
        ",
    )?;
    Ok(())
}
