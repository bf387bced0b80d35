//! Storage Module
//!
//! Key-value persistence for engine state:
//! - `KeyValueStore` trait the engine saves JSON blobs through
//! - In-memory store for tests and ephemeral sessions
//! - SQLite store with versioned migrations

mod memory;
mod migrations;
mod sqlite;

pub use memory::MemoryStore;
pub use migrations::{migrate, schema_version, MIGRATIONS, Migration};
pub use sqlite::SqliteStore;

use serde_json::Value;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Blob could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

// ============================================================================
// KEY-VALUE STORE
// ============================================================================

/// Durable home for JSON blobs, keyed by name.
///
/// Implementations must leave previously saved values intact when a save
/// fails.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, if any
    fn load(&self, key: &str) -> Result<Option<Value>>;

    /// Insert or replace the value under `key`
    fn save(&self, key: &str, value: &Value) -> Result<()>;

    /// Delete `key`; returns whether it existed
    fn remove(&self, key: &str) -> Result<bool>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &Value) -> Result<()> {
        (**self).save(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &Value) -> Result<()> {
        (**self).save(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }
}
