use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{StorageError, TokenStorage};

/// Storage file name in the data directory
pub const STORAGE_FILE: &str = "storage.json";

/// Key-value pairs kept in a single JSON object on disk.
///
/// Every operation re-reads the file so two handles on the same path
/// never disagree. Writes go through a temporary file and a rename.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Storage file inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(STORAGE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl TokenStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)?;
        debug!(path = ?self.path, key, "Stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
            debug!(path = ?self.path, key, "Removed value");
        }
        Ok(())
    }
}
