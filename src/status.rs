//! Cache sync status
//!
//! Read-only check of whether the cache files carry the marker's exact
//! modification time, i.e. whether the environment manager will consider
//! its cache current.

use filetime::FileTime;
use std::cmp::Ordering;
use std::path::PathBuf;

use crate::config::ReloadConfig;
use crate::reload::timestamps::{self, TimestampError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    InSync,
    /// Older than the marker; the manager will rebuild on next load
    Stale,
    /// Newer than the marker
    Ahead,
}

impl SyncState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncState::InSync => "in sync",
            SyncState::Stale => "stale",
            SyncState::Ahead => "ahead",
        }
    }

    fn compare(cache: FileTime, marker: FileTime) -> Self {
        match cache.cmp(&marker) {
            Ordering::Equal => SyncState::InSync,
            Ordering::Less => SyncState::Stale,
            Ordering::Greater => SyncState::Ahead,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub path: PathBuf,
    pub modified: FileTime,
    pub state: SyncState,
}

#[derive(Debug, Clone)]
pub struct SyncStatus {
    pub marker: PathBuf,
    pub marker_modified: FileTime,
    pub entries: Vec<CacheEntry>,
}

impl SyncStatus {
    /// At least one cache file, and every one matches the marker
    pub fn is_synced(&self) -> bool {
        !self.entries.is_empty() && self.entries.iter().all(|e| e.state == SyncState::InSync)
    }
}

/// Compare every cache file against the marker
pub fn inspect(config: &ReloadConfig) -> Result<SyncStatus, TimestampError> {
    let marker = config.marker_path();
    let marker_modified = timestamps::read_stamp(&marker)?.modified;

    let mut entries = Vec::new();
    for path in timestamps::cache_files(&config.cache_path(), &config.cache_suffix)? {
        let modified = timestamps::read_stamp(&path)?.modified;
        entries.push(CacheEntry {
            state: SyncState::compare(modified, marker_modified),
            path,
            modified,
        });
    }

    Ok(SyncStatus {
        marker,
        marker_modified,
        entries,
    })
}
