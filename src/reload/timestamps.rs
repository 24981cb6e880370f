//! Marker and cache-file timestamps
//!
//! The environment manager decides whether its cache is stale by comparing
//! the cache files' mtimes to the marker's. Touching the marker and then
//! copying its exact timestamps onto the cache files makes the freshly
//! rebuilt cache look current.

use filetime::FileTime;
use std::io::ErrorKind;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

/// Access and modification time of a file, nanosecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp {
    pub accessed: FileTime,
    pub modified: FileTime,
}

/// Read a file's timestamps (following symlinks)
pub fn read_stamp(path: &Path) -> Result<Stamp, TimestampError> {
    let meta = std::fs::metadata(path).map_err(|source| TimestampError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Stamp {
        accessed: FileTime::from_last_access_time(&meta),
        modified: FileTime::from_last_modification_time(&meta),
    })
}

/// Set a file's timestamps. Never creates the file.
pub fn write_stamp(path: &Path, stamp: Stamp) -> Result<(), TimestampError> {
    filetime::set_file_times(path, stamp.accessed, stamp.modified).map_err(|source| {
        TimestampError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Bump a file's timestamps to now and return what the filesystem stored
///
/// The stored value can differ from the requested one on filesystems with
/// coarse timestamp granularity, so it is read back.
pub fn touch_now(path: &Path) -> Result<Stamp, TimestampError> {
    let now = FileTime::now();
    write_stamp(
        path,
        Stamp {
            accessed: now,
            modified: now,
        },
    )?;
    read_stamp(path)
}

/// Regular files directly inside `dir` whose name ends with `suffix`
///
/// Names are matched as raw bytes, so non-UTF-8 paths work. Dotfiles are
/// skipped, like a shell `*` glob. A missing directory yields no files.
pub fn cache_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>, TimestampError> {
    let list_error = |source: std::io::Error| TimestampError::List {
        path: dir.to_path_buf(),
        source,
    };

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("No cache directory at {}", dir.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(list_error(e)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(list_error)?;
        let name = entry.file_name();
        let name = name.as_bytes();

        if name.starts_with(b".") || !name.ends_with(suffix.as_bytes()) {
            continue;
        }

        let path = entry.path();
        if path.is_file() {
            files.push(path);
        } else {
            log::debug!("Skipping non-file {}", path.display());
        }
    }
    files.sort();

    if files.is_empty() {
        log::debug!("No *{} files in {}", suffix, dir.display());
    }

    Ok(files)
}

/// Copy `stamp` onto every cache file, returning the files touched
pub fn sync_cache_files(
    dir: &Path,
    suffix: &str,
    stamp: Stamp,
) -> Result<Vec<PathBuf>, TimestampError> {
    let files = cache_files(dir, suffix)?;
    for file in &files {
        write_stamp(file, stamp)?;
        log::debug!("Synced {}", file.display());
    }
    Ok(files)
}

#[derive(Debug, thiserror::Error)]
pub enum TimestampError {
    #[error("Failed to read timestamps of {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to set timestamps of {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to list cache files in {}: {source}", .path.display())]
    List {
        path: PathBuf,
        source: std::io::Error,
    },
}
