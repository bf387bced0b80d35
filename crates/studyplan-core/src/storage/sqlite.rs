//! SQLite Key-Value Store
//!
//! JSON blobs in a single `kv_store` table, with separate reader and writer
//! connections so every method takes `&self`.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use super::{KeyValueStore, Result, StorageError};

const DB_FILE_NAME: &str = "studyplan.db";

#[cfg(feature = "encryption")]
const ENCRYPTION_KEY_VAR: &str = "STUDYPLAN_ENCRYPTION_KEY";

/// SQLite-backed [`KeyValueStore`]
pub struct SqliteStore {
    writer: Mutex<Connection>,
    reader: Mutex<Connection>,
    path: PathBuf,
}

impl SqliteStore {
    /// Open (or create) the store at `db_path`, or at [`Self::default_path`].
    ///
    /// Migrations run on the writer connection before the reader is opened.
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = db_path.map_or_else(Self::default_path, Ok)?;

        let writer = open_connection(&path)?;
        restrict_permissions(&path, 0o600);

        let ran = super::migrations::migrate(&writer)?;
        if ran > 0 {
            tracing::info!(steps = ran, path = %path.display(), "Key-value store ready");
        }

        let reader = open_connection(&path)?;

        Ok(Self {
            writer: Mutex::new(writer),
            reader: Mutex::new(reader),
            path,
        })
    }

    /// `<platform data dir>/studyplan.db`, creating the directory if needed
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "studyplan", "core")
            .ok_or_else(|| StorageError::Init("No home directory for the data dir".to_string()))?;

        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;
        restrict_permissions(data_dir, 0o700);

        Ok(data_dir.join(DB_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored keys, sorted
    pub fn keys(&self) -> Result<Vec<String>> {
        let conn = self.read()?;
        let mut stmt = conn.prepare("SELECT key FROM kv_store ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(keys)
    }

    /// When `key` was last saved
    pub fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let stamp: Option<String> = self
            .read()?
            .query_row(
                "SELECT updated_at FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(stamp
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.to_utc()))
    }

    fn read(&self) -> Result<MutexGuard<'_, Connection>> {
        self.reader
            .lock()
            .map_err(|_| StorageError::Init("SQLite reader lock poisoned".to_string()))
    }

    fn write(&self) -> Result<MutexGuard<'_, Connection>> {
        self.writer
            .lock()
            .map_err(|_| StorageError::Init("SQLite writer lock poisoned".to_string()))
    }
}

impl KeyValueStore for SqliteStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        let text: Option<String> = self
            .read()?
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        text.map(|t| serde_json::from_str(&t))
            .transpose()
            .map_err(StorageError::from)
    }

    fn save(&self, key: &str, value: &Value) -> Result<()> {
        let text = serde_json::to_string(value)?;
        self.write()?.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, text, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let deleted = self
            .write()?
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(deleted > 0)
    }
}

/// Open a connection with the store's PRAGMAs (and SQLCipher key, if built
/// with `encryption` and the key variable is set).
fn open_connection(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;

    #[cfg(feature = "encryption")]
    if let Some(key) = std::env::var(ENCRYPTION_KEY_VAR).ok().filter(|k| !k.is_empty()) {
        conn.pragma_update(None, "key", &key)?;
    }

    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA busy_timeout = 5000;",
    )?;
    Ok(conn)
}

/// Owner-only access on Unix; best effort
#[cfg(unix)]
fn restrict_permissions(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)) {
        tracing::debug!(path = %path.display(), "Could not restrict permissions: {}", e);
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path, _mode: u32) {}

// ============================================================================
// TESTS
// ============================================================================
