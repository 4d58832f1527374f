//! Local key-value storage for client state.
//!
//! One JSON document per key under a data directory. Documents carry no
//! schema version: anything absent or unreadable loads as the empty value.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

/// Fixed document keys.
pub mod keys {
    pub const CART: &str = "cart";
    pub const WISHLIST: &str = "wishlist";
    pub const ORDERS: &str = "orders";
    pub const USER: &str = "user";
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Directory-backed document store.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    /// Storage rooted at `dir`. The directory is created on first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    async fn read(&self, key: &str) -> Option<Vec<u8>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key, "No stored document, using empty value");
                None
            }
            Err(e) => {
                warn!(key, path = %path.display(), error = %e, "Failed to read stored document");
                None
            }
        }
    }

    /// Load the document under `key`, or `T::default()` if it is missing or
    /// malformed.
    pub async fn load<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        let Some(bytes) = self.read(key).await else {
            return T::default();
        };

        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            warn!(key, error = %e, "Stored document is malformed, using empty value");
            T::default()
        })
    }

    /// Load an array document entry by entry.
    ///
    /// Entries that do not decode as `E` are skipped; the rest are kept. A
    /// document that is missing or not an array loads as `T::default()`.
    pub async fn load_entries<E, T>(&self, key: &str) -> T
    where
        E: DeserializeOwned,
        T: From<Vec<E>> + Default,
    {
        let Some(bytes) = self.read(key).await else {
            return T::default();
        };

        let raw: Vec<serde_json::Value> = match serde_json::from_slice(&bytes) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "Stored document is malformed, using empty value");
                return T::default();
            }
        };

        let entries: Vec<E> = raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| {
                serde_json::from_value(value)
                    .map_err(|e| warn!(key, index, error = %e, "Skipping malformed stored entry"))
                    .ok()
            })
            .collect();
        T::from(entries)
    }

    /// Replace the document under `key`.
    ///
    /// Writes to a sibling temp file and renames it into place, so readers
    /// see either the old or the new document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or any filesystem step fails.
    pub async fn save<T>(&self, key: &str, value: &T) -> Result<(), StorageError>
    where
        T: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec_pretty(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StorageError::Io {
                path: self.dir.clone(),
                source,
            })?;

        let path = self.path(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|source| StorageError::Io {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|source| StorageError::Io {
                path: path.clone(),
                source,
            })?;

        debug!(key, bytes = bytes.len(), "Saved document");
        Ok(())
    }

    /// Delete the document under `key`. Missing documents are fine.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` for failures other than "not found".
    pub async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}
