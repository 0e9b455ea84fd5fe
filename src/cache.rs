//! Collection cache for skipping rescans.
//!
//! Building a collection reads every content file. On a site that serves
//! many requests between content edits this is wasted work, so a full build
//! stores its collection in a [`CacheStore`] and later builds restore it
//! without touching the content directories.
//!
//! # Design
//!
//! The store is a plain key-value interface ([`CacheStore`]); the builder
//! keeps its collection under one fixed key, [`COLLECTION_CACHE_KEY`].
//! Two stores ship with the crate:
//!
//! - [`MemoryCache`]: a mutex-guarded map, for long-running processes and tests.
//! - [`FileCache`]: one JSON file per key in a directory, written atomically
//!   (temp file + rename) so a concurrent reader never sees half a payload.
//!
//! ## Payload
//!
//! The stored value is a JSON envelope:
//!
//! - **`version`**: format version. Bump [`PAYLOAD_VERSION`] to invalidate all
//!   stored collections when the item format changes.
//! - **`fingerprint`**: SHA-256 of the build parameters (content roots,
//!   extensions, languages, index marker, requested language). A build with
//!   different parameters does not pick up a collection it did not produce.
//! - **`collection`**: the collection itself.
//!
//! Anything that fails to decode, or carries another version or fingerprint,
//! is a miss. Reads never fail; only writes report errors, and the builder
//! treats those as warnings.
//!
//! ## Invalidation
//!
//! Content edits are not detected. Call [`CacheStore::remove`] (the
//! `clear-cache` command) after changing content, or build without a cache.

use crate::collection::Collection;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Key under which the builder stores its collection.
pub const COLLECTION_CACHE_KEY: &str = "sitemenu.collection";

/// Version of the stored payload format.
pub const PAYLOAD_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Cache lock poisoned")]
    Poisoned,
}

/// Key-value store for serialized collections.
pub trait CacheStore {
    /// Stored value, or `None` on a miss or any read failure.
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;
    /// Drop a stored value. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), CacheError>;
}

impl<C: CacheStore + ?Sized> CacheStore for Arc<C> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        (**self).remove(key)
    }
}

/// In-process cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// Directory-backed cache, one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the value for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl CacheStore for FileCache {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        let temp_path = path.with_extension(format!("json.tmp-{}-{nanos}", std::process::id()));

        fs::write(&temp_path, value)?;
        if let Err(err) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(err.into());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<C> {
    version: u32,
    fingerprint: String,
    collection: C,
}

/// Serialize a collection for storage, marking the stored copy as cached.
pub fn encode_collection(collection: &Collection, fingerprint: &str) -> Result<String, CacheError> {
    let mut stored = collection.clone();
    stored.set_from_cache(true);
    let envelope = Envelope {
        version: PAYLOAD_VERSION,
        fingerprint: fingerprint.to_string(),
        collection: stored,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Restore a stored collection. `None` unless the payload decodes, matches
/// the current version and fingerprint, and is marked as cached.
pub fn decode_collection(payload: &str, fingerprint: &str) -> Option<Collection> {
    let envelope: Envelope<Collection> = serde_json::from_str(payload).ok()?;
    if envelope.version != PAYLOAD_VERSION || envelope.fingerprint != fingerprint {
        return None;
    }
    envelope
        .collection
        .from_cache()
        .then_some(envelope.collection)
}

/// SHA-256 over a sequence of build parameters, as a hex string.
///
/// Fields are NUL-terminated so `["ab", "c"]` and `["a", "bc"]` differ.
pub fn hash_build_params<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"collection\0");
    for field in fields {
        hasher.update(field.as_bytes());
        hasher.update(b"\0");
    }
    format!("{:x}", hasher.finalize())
}
