//! Schema migrations for the key-value store
//!
//! Each step runs in its own transaction together with its `schema_version`
//! row, so an interrupted upgrade resumes at the failed step.

use rusqlite::{params, Connection};

/// One schema step
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

/// Every schema step, oldest first
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "kv_store table",
        sql: "CREATE TABLE IF NOT EXISTS kv_store (
                  key        TEXT PRIMARY KEY,
                  value      TEXT NOT NULL,
                  updated_at TEXT NOT NULL
              );",
    },
    Migration {
        version: 2,
        name: "kv_store updated_at index",
        sql: "CREATE INDEX IF NOT EXISTS idx_kv_updated ON kv_store(updated_at);",
    },
];

fn ensure_version_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
             version    INTEGER PRIMARY KEY,
             name       TEXT NOT NULL,
             applied_at TEXT NOT NULL DEFAULT (datetime('now'))
         );",
    )
}

/// Highest applied version, 0 for a fresh database
pub fn schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    ensure_version_table(conn)?;
    conn.query_row(
        "SELECT IFNULL(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
}

/// Bring the schema up to date. Returns the number of steps run.
pub fn migrate(conn: &Connection) -> rusqlite::Result<u32> {
    let from = schema_version(conn)?;
    let mut ran = 0;

    for step in MIGRATIONS.iter().filter(|m| m.version > from) {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(step.sql)?;
        tx.execute(
            "INSERT INTO schema_version (version, name) VALUES (?1, ?2)",
            params![step.version, step.name],
        )?;
        tx.commit()?;

        tracing::info!(version = step.version, name = step.name, "Schema migrated");
        ran += 1;
    }

    Ok(ran)
}
