//! In-memory key-value store

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use super::{KeyValueStore, Result, StorageError};

/// Process-local store; contents vanish on drop
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.lock().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        let values = self
            .values
            .lock()
            .map_err(|_| StorageError::Init("Memory store lock poisoned".into()))?;
        Ok(values.get(key).cloned())
    }

    fn save(&self, key: &str, value: &Value) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| StorageError::Init("Memory store lock poisoned".into()))?;
        values.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| StorageError::Init("Memory store lock poisoned".into()))?;
        Ok(values.remove(key).is_some())
    }
}
