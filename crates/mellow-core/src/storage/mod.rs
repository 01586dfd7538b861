//! Persistent string-keyed storage.
//!
//! Everything the journal keeps between runs lives in a [`KvStore`]: the
//! serialized entry collection, the visual mode, and the in-progress session
//! timer. [`Database`] backs it with SQLite; [`MemoryKv`] is used in tests
//! and for session-scoped state.

mod config;
pub mod database;
pub mod prefs;
pub mod session_store;

pub use config::{AutosaveConfig, Config, FocusConfig, RecallConfig, StatsConfig};
pub use database::Database;
pub use prefs::{FileKv, Preferences, SessionFlags, VisualMode};
pub use session_store::{SessionStore, SESSIONS_KEY};

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::StorageError;

/// String-keyed, string-valued slot storage.
pub trait KvStore {
    /// Read a value. `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite a value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<K: KvStore + ?Sized> KvStore for &K {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// In-memory kv store.
#[derive(Debug, Default)]
pub struct MemoryKv {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Returns the data directory, creating it if needed.
///
/// `MELLOW_DATA_DIR` wins when set. Otherwise `~/.config/mellow[-dev]/`
/// based on MELLOW_ENV (set MELLOW_ENV=dev for a development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("MELLOW_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("MELLOW_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("mellow-dev")
            } else {
                base_dir.join("mellow")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_kv_roundtrip() {
        let kv = MemoryKv::new();
        assert!(kv.get("missing").unwrap().is_none());
        kv.set("k", "v").unwrap();
        assert_eq!(kv.get("k").unwrap().as_deref(), Some("v"));
        kv.set("k", "w").unwrap();
        assert_eq!(kv.get("k").unwrap().as_deref(), Some("w"));
    }

    #[test]
    fn reference_forwards_to_store() {
        let kv = MemoryKv::new();
        let by_ref: &MemoryKv = &kv;
        KvStore::set(&by_ref, "a", "1").unwrap();
        assert_eq!(kv.get("a").unwrap().as_deref(), Some("1"));
    }
}
