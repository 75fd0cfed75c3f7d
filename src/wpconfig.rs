//! Locating, reading and saving `wp-config.php`.
//!
//! The read-patch-write cycle is guarded: [`ConfigFile`] remembers the hash
//! of what it read and refuses to save if the file changed underneath it.

use crate::edit::{atomic_write, EditError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use xxhash_rust::xxh3::xxh3_64;

pub const CONFIG_FILE_NAME: &str = "wp-config.php";

/// Environment variable naming the config file explicitly.
pub const CONFIG_PATH_ENV: &str = "WP_CONFIG_PATH";

#[derive(Error, Debug)]
pub enum FileError {
    #[error("wp-config.php does not exist. Please run `wp core config` first.")]
    NotFound,

    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} was modified while it was being patched; nothing was written", .0.display())]
    ConcurrentModification(PathBuf),

    #[error("failed to write {}", .path.display())]
    Write { path: PathBuf, source: EditError },
}

/// Resolve the config file path.
///
/// Priority order:
/// 1. Explicit path (`--config`)
/// 2. `WP_CONFIG_PATH` environment variable
/// 3. `wp-config.php` in `start` or the nearest ancestor holding one
pub fn locate(explicit: Option<&Path>, start: &Path) -> Result<PathBuf, FileError> {
    if let Some(path) = explicit {
        return existing_file(path);
    }

    if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
        debug!(path = ?path, "using config path from {CONFIG_PATH_ENV}");
        return existing_file(Path::new(&path));
    }

    search_upwards(start).ok_or(FileError::NotFound)
}

/// Find `wp-config.php` in `start` or any of its ancestors.
pub fn search_upwards(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

fn existing_file(path: &Path) -> Result<PathBuf, FileError> {
    if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(FileError::NotFound)
    }
}

/// Contents of the config file as read, plus what is needed to save safely.
///
/// Content is kept as bytes: the file need not be valid UTF-8.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    content: Vec<u8>,
    hash: u64,
}

impl ConfigFile {
    pub fn read(path: impl Into<PathBuf>) -> Result<Self, FileError> {
        let path = path.into();
        let content = fs::read(&path).map_err(|source| FileError::Io {
            path: path.clone(),
            source,
        })?;
        let hash = xxh3_64(&content);
        debug!(path = %path.display(), bytes = content.len(), "read config file");

        Ok(Self {
            path,
            content,
            hash,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Write `new_content` back, provided the file still holds what was read.
    ///
    /// Returns `false` without touching the file when the content is
    /// unchanged. A symlinked config is written through to its target.
    pub fn save(&self, new_content: &[u8]) -> Result<bool, FileError> {
        if new_content == self.content {
            debug!(path = %self.path.display(), "content unchanged, skipping write");
            return Ok(false);
        }

        let on_disk = fs::read(&self.path).map_err(|source| FileError::Io {
            path: self.path.clone(),
            source,
        })?;
        if xxh3_64(&on_disk) != self.hash {
            return Err(FileError::ConcurrentModification(self.path.clone()));
        }

        atomic_write(&self.path, new_content).map_err(|source| FileError::Write {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), "config file updated");

        Ok(true)
    }
}
