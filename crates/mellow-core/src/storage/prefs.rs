//! Small persisted preferences: the active visual mode and the
//! once-per-session intro flag.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::KvStore;
use crate::error::{StorageError, ValidationError};

const MODE_KEY: &str = "mellow_mode";
const INTRO_KEY: &str = "neural_core_boot_completed";

/// Visual presentation mode. Only the name is persisted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualMode {
    #[default]
    Flow,
    Focus,
    Freeze,
    Float,
}

impl VisualMode {
    pub const ALL: [VisualMode; 4] = [
        VisualMode::Flow,
        VisualMode::Focus,
        VisualMode::Freeze,
        VisualMode::Float,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VisualMode::Flow => "flow",
            VisualMode::Focus => "focus",
            VisualMode::Freeze => "freeze",
            VisualMode::Float => "float",
        }
    }
}

impl fmt::Display for VisualMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisualMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        VisualMode::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| ValidationError::UnknownName {
                kind: "visual mode",
                value: s.to_string(),
            })
    }
}

/// Long-lived preferences stored next to the journal.
pub struct Preferences<K: KvStore> {
    kv: K,
}

impl<K: KvStore> Preferences<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    /// Active mode; unknown or unreadable values fall back to flow.
    pub fn mode(&self) -> VisualMode {
        match self.kv.get(MODE_KEY) {
            Ok(Some(name)) => name.parse().unwrap_or_default(),
            Ok(None) => VisualMode::default(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read visual mode");
                VisualMode::default()
            }
        }
    }

    pub fn set_mode(&self, mode: VisualMode) -> Result<(), StorageError> {
        self.kv.set(MODE_KEY, mode.as_str())
    }
}

/// Flags that only last for the current machine session.
pub struct SessionFlags<K: KvStore> {
    kv: K,
}

impl SessionFlags<FileKv> {
    /// Flags backed by a file in the OS temp directory.
    pub fn temp() -> Self {
        Self::new(FileKv::new(std::env::temp_dir().join("mellow-session.json")))
    }
}

impl<K: KvStore> SessionFlags<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    pub fn intro_shown(&self) -> bool {
        matches!(self.kv.get(INTRO_KEY), Ok(Some(v)) if v == "true")
    }

    /// Record that the intro ran. Best effort: a failed write only means the
    /// intro shows again next time.
    pub fn mark_intro_shown(&self) {
        if let Err(e) = self.kv.set(INTRO_KEY, "true") {
            tracing::debug!(error = %e, "could not record intro flag");
        }
    }
}

/// Kv store kept as one JSON object in a file.
#[derive(Debug, Clone)]
pub struct FileKv {
    path: PathBuf,
}

impl FileKv {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<HashMap<String, String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content).unwrap_or_default()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(source) => Err(StorageError::SlotFile {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

impl KvStore for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_map()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        let content = serde_json::to_string(&map).unwrap_or_else(|_| "{}".to_string());
        std::fs::write(&self.path, content).map_err(|source| StorageError::SlotFile {
            path: self.path.clone(),
            source,
        })
    }
}
