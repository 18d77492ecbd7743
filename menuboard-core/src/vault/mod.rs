// menuboard-core/src/vault/mod.rs

use crate::error::VaultError;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

pub mod schema;

/// Key under which the device identity is persisted.
pub const DEVICE_ID_KEY: &str = "deviceId";

// ════════════════════════════════════════════════════════════════════
// LocalState
// ════════════════════════════════════════════════════════════════════

/// A persistent string key-value store.
pub trait LocalState: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, VaultError>;
    fn set(&self, key: &str, value: &str) -> Result<(), VaultError>;
}

/// Read the device id, creating and persisting a fresh v4 UUID if there is
/// none. A blank stored value counts as none.
pub fn resolve_device_id(state: &dyn LocalState) -> Result<String, VaultError> {
    if let Some(id) = state.get(DEVICE_ID_KEY)? {
        if !id.trim().is_empty() {
            tracing::debug!(device_id = %id, "using persisted device id");
            return Ok(id);
        }
    }

    let id = Uuid::new_v4().to_string();
    state.set(DEVICE_ID_KEY, &id)?;
    tracing::info!(device_id = %id, "generated new device id");
    Ok(id)
}

// ════════════════════════════════════════════════════════════════════
// Vault (sqlite)
// ════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct Vault {
    conn: Mutex<Connection>,
}

impl Vault {
    /// Open the Vault at the specified path.
    /// Creates the database file and runs migrations if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, VaultError> {
        let conn = Connection::open(&path)?;
        Self::init(conn)
    }

    /// A vault that lives only as long as the process.
    pub fn in_memory() -> Result<Self, VaultError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, VaultError> {
        conn.execute_batch(schema::MIGRATION_INIT)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, VaultError> {
        self.conn.lock().map_err(|_| VaultError::Poisoned)
    }

    /// Forget a key. Used when an operator wipes the display's identity.
    pub fn remove(&self, key: &str) -> Result<(), VaultError> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM local_state WHERE key = ?1", params![key])?;
        Ok(())
    }
}

impl LocalState for Vault {
    fn get(&self, key: &str) -> Result<Option<String>, VaultError> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM local_state WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), VaultError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO local_state (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().timestamp()],
        )?;
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════
// MemoryState
// ════════════════════════════════════════════════════════════════════

/// In-process store, for tests and displays without a writable disk.
#[derive(Debug, Default)]
pub struct MemoryState {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: &str) -> Self {
        let state = Self::new();
        if let Ok(mut values) = state.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        state
    }
}

impl LocalState for MemoryState {
    fn get(&self, key: &str) -> Result<Option<String>, VaultError> {
        let values = self.values.lock().map_err(|_| VaultError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), VaultError> {
        let mut values = self.values.lock().map_err(|_| VaultError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
