use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::io::lock::{DataLock, LockError};
use crate::model::task::Task;

/// Key holding the JSON task array
pub const DATA_KEY: &str = "taskmate_data";
/// Key holding the theme name
pub const THEME_KEY: &str = "taskmate_theme";
/// Theme used when none has been stored
pub const DEFAULT_THEME: &str = "dark";
/// File name used by export when none is given
pub const DEFAULT_EXPORT_FILE: &str = "mytasks.json";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("stored task data under '{key}' is not a valid task list: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },
    #[error("could not serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// String key/value store holding the persisted state.
///
/// Mirrors a browser's local storage: each key holds one string, reads of a
/// missing key are `None`, and writes replace the whole value.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Exclusive access for one read-modify-write cycle, released on drop.
    /// `None` when the storage is not shared with other processes.
    fn lock(&self) -> Result<Option<DataLock>, StorageError> {
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// File-backed storage
// ---------------------------------------------------------------------------

/// One file per key under a data directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
    locking: bool,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage {
            dir: dir.into(),
            locking: false,
        }
    }

    /// Take the data directory lock around every write cycle. For long-lived
    /// writers (the TUI); CLI commands hold one lock for the whole command.
    pub fn with_lock(mut self) -> Self {
        self.locking = true;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.key_path(key);
        fs::create_dir_all(&self.dir)
            .and_then(|()| atomic_write(&path, value.as_bytes()))
            .map_err(|source| StorageError::Write {
                path: path.clone(),
                source,
            })?;
        log::debug!("wrote {} ({} bytes)", path.display(), value.len());
        Ok(())
    }

    fn lock(&self) -> Result<Option<DataLock>, StorageError> {
        if !self.locking {
            return Ok(None);
        }
        Ok(Some(DataLock::acquire_default(&self.dir)?))
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// In-memory storage
// ---------------------------------------------------------------------------

/// Volatile storage for tests and embedding. Counts writes so callers can
/// check that every mutation persisted.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut storage = Self::default();
        storage.entries.insert(key.to_string(), value.to_string());
        storage
    }

    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.writes += 1;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Task list and theme
// ---------------------------------------------------------------------------

/// Load the task list. No stored data (or an empty value) means no tasks;
/// anything that is not a task array is an error and is left untouched.
pub fn load_tasks(storage: &dyn Storage) -> Result<Vec<Task>, StorageError> {
    let Some(raw) = storage.get(DATA_KEY)? else {
        return Ok(Vec::new());
    };
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
        key: DATA_KEY.to_string(),
        source,
    })
}

/// Rewrite the full task list.
pub fn save_tasks(storage: &mut dyn Storage, tasks: &[Task]) -> Result<(), StorageError> {
    let json = serde_json::to_string(tasks)?;
    storage.set(DATA_KEY, &json)
}

/// Stored theme name, or [`DEFAULT_THEME`]
pub fn load_theme(storage: &dyn Storage) -> String {
    match storage.get(THEME_KEY) {
        Ok(Some(name)) if !name.trim().is_empty() => name.trim().to_string(),
        Ok(_) => DEFAULT_THEME.to_string(),
        Err(e) => {
            log::warn!("theme unreadable, using default: {}", e);
            DEFAULT_THEME.to_string()
        }
    }
}

pub fn save_theme(storage: &mut dyn Storage, name: &str) -> Result<(), StorageError> {
    storage.set(THEME_KEY, name)
}

/// Write the task array verbatim to `path` as a downloadable JSON file.
pub fn export_tasks(tasks: &[Task], path: &Path) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(tasks)?;
    fs::write(path, json).map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Data directory
// ---------------------------------------------------------------------------

/// Resolve the data directory: explicit override, then `TASKMATE_DIR`,
/// then `$XDG_DATA_HOME/taskmate`, then `~/.local/share/taskmate`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Ok(dir) = std::env::var("TASKMATE_DIR")
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }
    let data_home = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local").join("share"));
    data_home.join("taskmate")
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}
