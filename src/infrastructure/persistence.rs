use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O failed for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("Storage quota of {limit} bytes exceeded writing '{key}'")]
    QuotaExceeded { key: String, limit: usize },
}

/// A persistent string slot store addressed by key.
pub trait KeyValueStore: std::fmt::Debug {
    /// Returns the stored value, or `None` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrites the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

fn check_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// Keeps each slot in `<dir>/<key>.json`.
///
/// Writes go to a sibling `.tmp` file which is then renamed over the slot,
/// so a reader never sees a half-written value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        check_key(key)?;
        let path = self.slot_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        check_key(key)?;
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.slot_path(key);
        let tmp_path = self.dir.join(format!("{key}.json.tmp"));
        let write_tmp = || -> io::Result<()> {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()
        };
        write_tmp().map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &path).map_err(|source| StoreError::Io { path, source })?;
        tracing::debug!(key, bytes = value.len(), "slot written");
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemorySlots {
    values: HashMap<String, String>,
    writes: usize,
}

/// In-process store with an optional byte quota.
///
/// Clones share the same slots, so a handle kept aside can observe what
/// another owner wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Rc<RefCell<MemorySlots>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that refuses any value longer than `limit` bytes.
    pub fn with_quota(limit: usize) -> Self {
        Self {
            quota: Some(limit),
            ..Self::default()
        }
    }

    /// Seeds a slot without counting it as a write.
    pub fn insert(&self, key: &str, value: &str) {
        self.slots
            .borrow_mut()
            .values
            .insert(key.to_string(), value.to_string());
    }

    /// Number of successful `set` calls.
    pub fn writes(&self) -> usize {
        self.slots.borrow().writes
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.slots.borrow().values.get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        check_key(key)?;
        Ok(self.value(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        check_key(key)?;
        if let Some(limit) = self.quota {
            if value.len() > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    limit,
                });
            }
        }
        let mut slots = self.slots.borrow_mut();
        slots.values.insert(key.to_string(), value.to_string());
        slots.writes += 1;
        Ok(())
    }
}
