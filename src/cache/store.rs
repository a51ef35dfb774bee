// Validator cache store.
// Persists the last ETag and the events it validated, one record per user.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{OctofeedError, Result};
use crate::github::RawEvent;

use super::paths::{cache_key, user_events_path};

/// Last known good response for one user.
///
/// `etag` always validates exactly `events`; the two are written together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub etag: Option<String>,
    pub events: Vec<RawEvent>,
    /// When the record was written.
    pub cached_at: DateTime<Utc>,
}

impl CacheRecord {
    pub fn new(etag: Option<String>, events: Vec<RawEvent>) -> Self {
        Self {
            etag,
            events,
            cached_at: Utc::now(),
        }
    }
}

/// Storage for validator records.
///
/// `load` never fails: a missing or corrupt record reads as `None`.
pub trait ValidatorCache {
    fn load(&self, identity: &str) -> Option<CacheRecord>;

    /// Replace the record for `identity`. Last writer wins.
    fn store(&self, identity: &str, record: &CacheRecord) -> Result<()>;
}

/// JSON-file cache, one document per user.
#[derive(Debug, Clone)]
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, identity: &str) -> PathBuf {
        user_events_path(&self.root, identity)
    }

    fn read_record(path: &Path) -> Result<Option<CacheRecord>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path).map_err(|e| OctofeedError::CacheUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let record = serde_json::from_str(&contents).map_err(|e| {
            OctofeedError::CacheUnreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        Ok(Some(record))
    }
}

impl ValidatorCache for FileCache {
    fn load(&self, identity: &str) -> Option<CacheRecord> {
        let path = self.path_for(identity);
        match Self::read_record(&path) {
            Ok(record) => {
                debug!(identity, found = record.is_some(), "cache lookup");
                record
            }
            Err(e) => {
                warn!(identity, error = %e, "ignoring unreadable cache record");
                None
            }
        }
    }

    fn store(&self, identity: &str, record: &CacheRecord) -> Result<()> {
        let path = self.path_for(identity);
        write_atomic(&path, &serde_json::to_string_pretty(record)?)?;
        debug!(identity, path = %path.display(), events = record.events.len(), "cache record written");
        Ok(())
    }
}

/// Write a file atomically via a temp file and rename.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// In-process cache; nothing survives the run.
#[derive(Debug, Default)]
pub struct MemoryCache {
    records: Mutex<HashMap<String, CacheRecord>>,
    writes: AtomicUsize,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `store` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

impl ValidatorCache for MemoryCache {
    fn load(&self, identity: &str) -> Option<CacheRecord> {
        self.records
            .lock()
            .ok()
            .and_then(|records| records.get(&cache_key(identity)).cloned())
    }

    fn store(&self, identity: &str, record: &CacheRecord) -> Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| OctofeedError::Io(std::io::Error::other("memory cache poisoned")))?;
        records.insert(cache_key(identity), record.clone());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

impl<C: ValidatorCache + ?Sized> ValidatorCache for &C {
    fn load(&self, identity: &str) -> Option<CacheRecord> {
        (**self).load(identity)
    }

    fn store(&self, identity: &str, record: &CacheRecord) -> Result<()> {
        (**self).store(identity, record)
    }
}

impl<C: ValidatorCache + ?Sized> ValidatorCache for Box<C> {
    fn load(&self, identity: &str) -> Option<CacheRecord> {
        (**self).load(identity)
    }

    fn store(&self, identity: &str, record: &CacheRecord) -> Result<()> {
        (**self).store(identity, record)
    }
}
