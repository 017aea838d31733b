pub mod error;

use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::PathBuf;

pub use error::StorageError;
use tracing::{debug, warn};

/// String key-value storage with the semantics of the browser's `localStorage`:
/// missing keys read as `None`, writes replace the previous value.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Stores all keys in one JSON object on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!("storage file {} does not exist yet", self.path.display());
                return Ok(BTreeMap::new());
            }
            Err(error) => return Err(StorageError::Read(self.path.clone(), error)),
        };
        serde_json::from_str(&content).map_err(|error| StorageError::Corrupt(self.path.clone(), error))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = match self.read_all() {
            Ok(items) => items,
            // the other keys are lost either way, don't let them block this write
            Err(StorageError::Corrupt(path, error)) => {
                warn!("overwriting corrupt storage file {}: {error}", path.display());
                BTreeMap::new()
            }
            Err(error) => return Err(error),
        };
        items.insert(key.to_owned(), value.to_owned());
        let content = serde_json::to_string_pretty(&items).map_err(StorageError::Encode)?;

        let mut temporary = self.path.clone().into_os_string();
        temporary.push(".tmp");
        let temporary = PathBuf::from(temporary);
        std::fs::write(&temporary, content)
            .map_err(|error| StorageError::Write(temporary.clone(), error))?;
        std::fs::rename(&temporary, &self.path)
            .map_err(|error| StorageError::Write(self.path.clone(), error))
    }
}

#[derive(Debug, Clone)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    writable: bool,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
            writable: true,
        }
    }
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A storage that rejects every write, like a browser with storage disabled
    /// or a full quota.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            items: HashMap::new(),
            writable: false,
        }
    }

    pub fn set_writable(&mut self, writable: bool) {
        self.writable = writable;
    }

    #[must_use]
    pub fn with_item(mut self, key: &str, value: &str) -> Self {
        self.items.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if !self.writable {
            return Err(StorageError::ReadOnly);
        }
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
