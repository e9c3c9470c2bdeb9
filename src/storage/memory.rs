//! In-memory filesystem.
//!
//! This module provides a thread-safe in-memory implementation of
//! [`FileSystem`]. It is intended for tests and for stores that should never
//! touch the disk, and doubles as a reference implementation of the contract.

use std::collections::{HashMap, HashSet};
use std::io::{Error as IoError, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{ShelfError, ShelfResult};
use crate::storage::traits::FileSystem;

fn lock_err(path: &Path, context: &'static str) -> ShelfError {
    ShelfError::io(path, IoError::other(format!("poisoned lock: {context}")))
}

#[derive(Debug, Default)]
struct MemoryState {
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: HashSet<PathBuf>,
    writes: usize,
}

/// Files and directories held in a map.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    state: RwLock<MemoryState>,
}

impl MemoryFileSystem {
    /// Creates an empty filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the file's bytes, if it exists.
    #[must_use]
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let state = self.state.read().ok()?;
        state.files.get(path.as_ref()).cloned()
    }

    /// Returns true if `ensure_directory` created (or was called for) `dir`.
    #[must_use]
    pub fn has_directory(&self, dir: impl AsRef<Path>) -> bool {
        self.state
            .read()
            .map(|s| s.dirs.contains(dir.as_ref()))
            .unwrap_or(false)
    }

    /// Number of successful `write_all` calls so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.state.read().map(|s| s.writes).unwrap_or(0)
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.state
            .read()
            .map(|s| s.files.contains_key(path))
            .unwrap_or(false)
    }

    fn ensure_directory(&self, dir: &Path) -> ShelfResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| lock_err(dir, "ensure_directory"))?;
        for ancestor in dir.ancestors().filter(|a| !a.as_os_str().is_empty()) {
            state.dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn read_all(&self, path: &Path) -> ShelfResult<Vec<u8>> {
        let state = self.state.read().map_err(|_| lock_err(path, "read_all"))?;
        state.files.get(path).cloned().ok_or_else(|| {
            ShelfError::io(path, IoError::new(ErrorKind::NotFound, "no such file"))
        })
    }

    fn write_all(&self, path: &Path, bytes: &[u8]) -> ShelfResult<()> {
        let mut state = self.state.write().map_err(|_| lock_err(path, "write_all"))?;
        state.files.insert(path.to_path_buf(), bytes.to_vec());
        state.writes += 1;
        Ok(())
    }
}
