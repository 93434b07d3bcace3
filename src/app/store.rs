// SimpleLogs - app/store.rs
//
// Persistence of the log collection in a single key-value slot, as JSON.
//
// Design principles:
// - Writes are atomic (write→temp, rename→final) so a crash during save
//   never corrupts the previous good snapshot.
// - Load never fails: an absent slot or corrupt data loads as an empty
//   collection. Corruption is logged, not surfaced.
// - The data directory is created on first save; no user action required.

use crate::core::model::LogEntry;
use crate::util::constants::{MAX_STORAGE_KEY_LENGTH, STORAGE_FILE_EXTENSION};
use crate::util::error::StoreError;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// A place to keep the serialised collection between runs.
pub trait Store {
    /// Read the stored collection. Absent or unreadable data is an empty
    /// collection.
    fn load(&self) -> Vec<LogEntry>;

    /// Replace the stored collection with `entries`.
    fn save(&self, entries: &[LogEntry]) -> Result<(), StoreError>;
}

/// Decode a stored snapshot, treating anything malformed as empty.
fn decode(slot: &str, text: &str) -> Vec<LogEntry> {
    match serde_json::from_str::<Vec<LogEntry>>(text) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(slot, error = %e, "Stored logs are malformed, starting empty");
            Vec::new()
        }
    }
}

fn encode(entries: &[LogEntry]) -> Result<String, StoreError> {
    serde_json::to_string(entries).map_err(|source| StoreError::Serialize { source })
}

// =============================================================================
// File-backed store
// =============================================================================

/// One JSON file per slot inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    key: String,
    path: PathBuf,
}

impl FileStore {
    /// Store for slot `key` under `data_dir`.
    ///
    /// The key is mapped to a portable file name: anything other than ASCII
    /// alphanumerics, `-`, `_` and `.` becomes `-`, so `simplelogs:v1` lives in
    /// `simplelogs-v1.json`.
    pub fn new(data_dir: &Path, key: &str) -> Self {
        Self {
            key: key.to_string(),
            path: data_dir.join(format!("{}.{STORAGE_FILE_EXTENSION}", slot_file_stem(key))),
        }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// File stem for a storage key.
pub fn slot_file_stem(key: &str) -> String {
    let stem: String = key
        .chars()
        .take(MAX_STORAGE_KEY_LENGTH)
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect();
    let stem = stem.trim_matches('.');
    if stem.is_empty() {
        "default".to_string()
    } else {
        stem.to_string()
    }
}

impl Store for FileStore {
    fn load(&self) -> Vec<LogEntry> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                // "File not found" is the normal first run.
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), error = %e, "Cannot read stored logs");
                }
                return Vec::new();
            }
        };

        let entries = decode(&self.key, &content);
        tracing::debug!(path = %self.path.display(), entries = entries.len(), "Stored logs loaded");
        entries
    }

    fn save(&self, entries: &[LogEntry]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = encode(entries)?;

        // A crash between write and rename loses the new snapshot but never
        // corrupts the previous one.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json.as_bytes()).map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;

        std::fs::rename(&tmp, &self.path).map_err(|source| {
            let _ = std::fs::remove_file(&tmp);
            StoreError::Write {
                path: self.path.clone(),
                source,
            }
        })?;

        tracing::debug!(path = %self.path.display(), entries = entries.len(), "Logs saved");
        Ok(())
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// A slot held in memory, still going through the JSON encoding so it behaves
/// like the file store (including for corrupt contents).
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with raw slot text, e.g. a corrupt snapshot.
    pub fn with_raw(text: impl Into<String>) -> Self {
        Self {
            slot: RefCell::new(Some(text.into())),
        }
    }

    /// Current raw slot text.
    pub fn raw(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Vec<LogEntry> {
        match self.slot.borrow().as_deref() {
            Some(text) => decode("memory", text),
            None => Vec::new(),
        }
    }

    fn save(&self, entries: &[LogEntry]) -> Result<(), StoreError> {
        *self.slot.borrow_mut() = Some(encode(entries)?);
        Ok(())
    }
}

// Lets a caller keep ownership of the store while a repository uses it.
impl<S: Store + ?Sized> Store for &S {
    fn load(&self) -> Vec<LogEntry> {
        (**self).load()
    }

    fn save(&self, entries: &[LogEntry]) -> Result<(), StoreError> {
        (**self).save(entries)
    }
}
