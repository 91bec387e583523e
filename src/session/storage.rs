//! Durable backends for the session context.
//!
//! A backend holds a flat string map. Every write goes through `commit`,
//! which applies a batch of changes as one unit: `FileStorage` rewrites
//! the whole document through a temp file and rename, so a reader never
//! observes half of a batch.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Key/value pairs held by a backend.
pub type Entries = BTreeMap<String, String>;

/// One mutation inside a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Set { key: String, value: String },
    Remove { key: String },
}

impl Change {
    pub fn set(key: &str, value: impl Into<String>) -> Self {
        Self::Set {
            key: key.to_string(),
            value: value.into(),
        }
    }

    pub fn remove(key: &str) -> Self {
        Self::Remove {
            key: key.to_string(),
        }
    }

    fn apply(&self, entries: &mut Entries) {
        match self {
            Change::Set { key, value } => {
                entries.insert(key.clone(), value.clone());
            }
            Change::Remove { key } => {
                entries.remove(key);
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Session storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Session storage encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Process-external holder of session entries.
pub trait SessionStorage: Send + Sync {
    /// Read every entry.
    fn load(&self) -> Result<Entries, StorageError>;

    /// Apply `changes` in order as a single write.
    fn commit(&self, changes: &[Change]) -> Result<(), StorageError>;
}

// ═══════════════════════════════════════════════════════════
// FileStorage
// ═══════════════════════════════════════════════════════════

/// File name of the session document inside the session directory.
pub const SESSION_FILE: &str = "session.json";

/// JSON document on disk, owner-only permissions on Unix.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    fn read_entries(&self) -> Result<Entries, StorageError> {
        let path = self.path();
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Unreadable session file, treating as empty");
                Ok(Entries::new())
            }
        }
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Entries, StorageError> {
        self.read_entries()
    }

    fn commit(&self, changes: &[Change]) -> Result<(), StorageError> {
        let mut entries = self.read_entries()?;
        for change in changes {
            change.apply(&mut entries);
        }

        std::fs::create_dir_all(&self.dir)?;
        set_dir_permissions(&self.dir)?;

        let json = serde_json::to_vec_pretty(&entries)?;
        // NamedTempFile is created 0600 in the target directory, so the
        // rename below stays on one filesystem.
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.path())
            .map_err(|e| StorageError::Io(e.error))?;

        tracing::debug!(path = %self.path().display(), entries = entries.len(), "Session file written");
        Ok(())
    }
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), StorageError> {
    use std::os::unix::fs::PermissionsExt;
    let perms = std::fs::Permissions::from_mode(0o700);
    std::fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), StorageError> {
    // Windows ACLs are managed by the OS; no POSIX chmod equivalent needed
    Ok(())
}

// ═══════════════════════════════════════════════════════════
// MemoryStorage
// ═══════════════════════════════════════════════════════════

/// In-process backend; contents vanish with the process.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<Entries>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-populated with raw entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Entries, StorageError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn commit(&self, changes: &[Change]) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        for change in changes {
            change.apply(&mut entries);
        }
        Ok(())
    }
}
