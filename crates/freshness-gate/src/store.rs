use dashmap::DashMap;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{GateError, GateResult};

/// Key/value persistence for the freshness marker
pub trait MarkerStore: Send + Sync {
    fn get(&self, key: &str) -> GateResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> GateResult<()>;
}

impl<S: MarkerStore + ?Sized> MarkerStore for Box<S> {
    fn get(&self, key: &str) -> GateResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> GateResult<()> {
        (**self).set(key, value)
    }
}

/// Process-local store, used in tests and when nothing should outlive the run
#[derive(Debug, Default)]
pub struct MemoryMarkerStore {
    values: DashMap<String, String>,
}

impl MemoryMarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.values.insert(key.to_string(), value.to_string());
        store
    }
}

impl MarkerStore for MemoryMarkerStore {
    fn get(&self, key: &str) -> GateResult<Option<String>> {
        Ok(self.values.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> GateResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object on disk (`{"lastScrapedDate": "2024-01-01"}`) that survives
/// across runs on the same machine
#[derive(Debug, Clone)]
pub struct FileMarkerStore {
    path: PathBuf,
}

impl FileMarkerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.issuer-dashboard/marker.json`
    pub fn default_path() -> GateResult<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| GateError::Store("Cannot determine home directory".to_string()))?;
        Ok(home.join(".issuer-dashboard").join("marker.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> GateResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }
}

impl MarkerStore for FileMarkerStore {
    fn get(&self, key: &str) -> GateResult<Option<String>> {
        Ok(self.load()?.get(key).cloned())
    }

    /// Rewrites the whole file through a sibling temp file and a rename.
    /// A file that no longer parses is replaced.
    fn set(&self, key: &str, value: &str) -> GateResult<()> {
        let mut values = match self.load() {
            Ok(values) => values,
            Err(GateError::Serialization(e)) => {
                tracing::warn!("Replacing unreadable marker file {}: {}", self.path.display(), e);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(&values)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
