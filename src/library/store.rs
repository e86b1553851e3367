//! JSON-file-backed document store.

use carmine_common::{Error, Result};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A single JSON document kept in memory and mirrored to disk.
///
/// Mutations run against a copy of the document; the copy replaces the
/// in-memory state only after it has been written, so a failed write
/// leaves both memory and disk untouched.
pub struct JsonStore<T> {
    data: RwLock<T>,
    path: PathBuf,
}

impl<T> JsonStore<T>
where
    T: Default + Clone + Serialize + DeserializeOwned,
{
    /// Load the document at `path`, or start from the default when the file
    /// is missing or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match load_from_file(&path) {
            Ok(Some(data)) => data,
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!("Ignoring unreadable store {:?}: {}", path, e);
                T::default()
            }
        };
        Self {
            data: RwLock::new(data),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run a read-only closure against the document.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.data.read())
    }

    /// Clone the whole document.
    pub fn snapshot(&self) -> T {
        self.data.read().clone()
    }

    /// Read-modify-write under the write lock, then persist.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> Result<R>) -> Result<R> {
        let mut guard = self.data.write();
        let mut next = guard.clone();
        let result = f(&mut next)?;
        self.save_to_file(&next)?;
        *guard = next;
        Ok(result)
    }

    fn save_to_file(&self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| Error::internal(format!("Failed to serialize {:?}: {e}", self.path)))?;
        std::fs::write(&self.path, json).map_err(|e| {
            tracing::error!("Failed to persist {:?}: {}", self.path, e);
            Error::from(e)
        })
    }
}

fn load_from_file<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}
