//! String key-value storage backing the session.
//!
//! This is the persisted state the session reader works from. Two implementations are provided:
//! - [`MemoryStore`] keeps entries in process, for tests and per-request stores.
//! - [`FileStore`] keeps entries in a JSON object on disk. The file is re-read on every access so
//!   that a login or logout performed by another process is picked up on the next read.

use crate::{PortalError, PortalResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub trait KeyValueStore {
    fn get(&self, key: &str) -> PortalResult<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> PortalResult<()>;

    fn remove(&mut self, key: &str) -> PortalResult<()>;

    /// Write several entries as one operation where the backend allows it.
    fn set_many(&mut self, entries: &[(&str, &str)]) -> PortalResult<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Remove several entries as one operation where the backend allows it.
    fn remove_many(&mut self, keys: &[&str]) -> PortalResult<()> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    /// Infallible write, for callers holding a concrete `MemoryStore`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> PortalResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> PortalResult<()> {
        self.insert(key, value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PortalResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// A JSON-file backed store.
///
/// Multi-key writes are applied to one in-memory copy and then written to a temporary sibling
/// file that is renamed over the original, so readers never observe half of a login.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> PortalResult<BTreeMap<String, String>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(PortalError::StoreRead(e)),
        };
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(PortalError::StoreFormat)
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> PortalResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(PortalError::StoreDirCreation)?;
        }

        let buffer = serde_json::to_vec_pretty(entries).map_err(PortalError::Serialization)?;
        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        fs::write(&tmp_path, &buffer).map_err(PortalError::StoreWrite)?;
        fs::rename(&tmp_path, &self.path).map_err(PortalError::StoreWrite)
    }

    fn update(&mut self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> PortalResult<()> {
        let mut entries = self.load()?;
        apply(&mut entries);
        self.save(&entries)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> PortalResult<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> PortalResult<()> {
        self.set_many(&[(key, value)])
    }

    fn remove(&mut self, key: &str) -> PortalResult<()> {
        self.remove_many(&[key])
    }

    fn set_many(&mut self, pairs: &[(&str, &str)]) -> PortalResult<()> {
        self.update(|entries| {
            for (key, value) in pairs {
                entries.insert((*key).to_owned(), (*value).to_owned());
            }
        })
    }

    fn remove_many(&mut self, keys: &[&str]) -> PortalResult<()> {
        self.update(|entries| {
            for key in keys {
                entries.remove(*key);
            }
        })
    }
}
