//! Keyed response store backing the offline cache.
//!
//! One entry per request identity, newest successful response wins. There is
//! no size or age eviction. When opened on a directory, every entry is also
//! written under `<root>/<generation>/` as a JSON record plus a raw body file,
//! so the catalog and shell stay usable across restarts. Each generation
//! directory carries a marker file; only marked directories are ever purged.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::transport::Response;
use crate::error::CacheError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub identity: String,
    pub response: Response,
    pub stored_at: DateTime<Utc>,
}

/// Marks a directory as a cache generation owned by this store.
pub const GENERATION_MARKER: &str = ".applaunch-generation";

#[derive(Serialize, Deserialize)]
struct CacheRecord {
    identity: String,
    status: u16,
    headers: Vec<(String, String)>,
    body_len: u64,
    stored_at: DateTime<Utc>,
}

impl From<&CacheEntry> for CacheRecord {
    fn from(entry: &CacheEntry) -> Self {
        Self {
            identity: entry.identity.clone(),
            status: entry.response.status,
            headers: entry.response.headers.clone(),
            body_len: entry.response.body.len() as u64,
            stored_at: entry.stored_at,
        }
    }
}

impl CacheRecord {
    fn into_entry(self, body: Vec<u8>) -> Option<CacheEntry> {
        if body.len() as u64 != self.body_len {
            return None;
        }
        Some(CacheEntry {
            identity: self.identity,
            response: Response {
                status: self.status,
                headers: self.headers,
                body,
            },
            stored_at: self.stored_at,
        })
    }
}

#[derive(Debug)]
pub struct CacheStore {
    generation: String,
    dir: Option<PathBuf>,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl CacheStore {
    pub fn in_memory(generation: impl Into<String>) -> Self {
        Self {
            generation: generation.into(),
            dir: None,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Opens (creating if needed) `<root>/<generation>` and loads its records.
    pub fn open(root: impl AsRef<Path>, generation: impl Into<String>) -> Result<Self, CacheError> {
        let generation = generation.into();
        let dir = root.as_ref().join(&generation);
        std::fs::create_dir_all(&dir)?;
        let marker = dir.join(GENERATION_MARKER);
        if !marker.exists() {
            std::fs::write(&marker, generation.as_bytes())?;
        }

        let mut entries = HashMap::new();
        for item in std::fs::read_dir(&dir)? {
            let path = item?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match load_record(&path) {
                Some(entry) => {
                    entries.insert(entry.identity.clone(), entry);
                }
                None => warn!(path = %path.display(), "skipping unreadable cache record"),
            }
        }

        info!(
            generation = %generation,
            entries = entries.len(),
            "opened offline cache"
        );
        Ok(Self {
            generation,
            dir: Some(dir),
            entries: RwLock::new(entries),
        })
    }

    pub fn generation(&self) -> &str {
        &self.generation
    }

    pub fn get(&self, identity: &str) -> Option<CacheEntry> {
        self.entries.read().get(identity).cloned()
    }

    /// Replaces whatever was stored for `identity`.
    pub fn put(&self, identity: &str, response: Response) -> Result<(), CacheError> {
        let entry = CacheEntry {
            identity: identity.to_string(),
            response,
            stored_at: Utc::now(),
        };
        // Held across the disk write so disk and memory see writers in the same order.
        let mut entries = self.entries.write();
        if let Some(dir) = &self.dir {
            persist_record(dir, &entry)?;
        }
        debug!(identity, bytes = entry.response.body.len(), "cache write");
        entries.insert(identity.to_string(), entry);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn identities(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Deletes every other generation directory next to this one. Directories
    /// without the generation marker are left alone. Returns the names that
    /// were removed.
    pub fn purge_other_generations(&self) -> Result<Vec<String>, CacheError> {
        let Some(root) = self.dir.as_deref().and_then(Path::parent) else {
            return Ok(Vec::new());
        };

        let mut removed = Vec::new();
        for item in std::fs::read_dir(root)? {
            let item = item?;
            if !item.file_type()?.is_dir() {
                continue;
            }
            let name = item.file_name().to_string_lossy().to_string();
            if name == self.generation {
                continue;
            }
            if !item.path().join(GENERATION_MARKER).is_file() {
                debug!(dir = %name, "not a cache generation, leaving it");
                continue;
            }
            std::fs::remove_dir_all(item.path())?;
            info!(generation = %name, "purged stale cache generation");
            removed.push(name);
        }
        removed.sort();
        Ok(removed)
    }
}

fn record_path(dir: &Path, identity: &str) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(identity.as_bytes());
    dir.join(format!("{}.json", hex::encode(hasher.finalize())))
}

fn write_atomic(dir: &Path, target: &Path, bytes: &[u8]) -> Result<(), CacheError> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(target).map_err(|e| CacheError::Io(e.error))?;
    Ok(())
}

/// Body first, then the record that vouches for it.
fn persist_record(dir: &Path, entry: &CacheEntry) -> Result<(), CacheError> {
    let record_path = record_path(dir, &entry.identity);
    write_atomic(dir, &record_path.with_extension("body"), &entry.response.body)?;
    let json = serde_json::to_vec(&CacheRecord::from(entry))?;
    write_atomic(dir, &record_path, &json)
}

fn load_record(path: &Path) -> Option<CacheEntry> {
    let raw = std::fs::read(path).ok()?;
    let record: CacheRecord = serde_json::from_slice(&raw).ok()?;
    let body = std::fs::read(path.with_extension("body")).ok()?;
    record.into_entry(body)
}
