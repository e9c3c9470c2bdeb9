//! Filesystem collaborator contract.
//!
//! The store never touches `std::fs` directly; it reads and writes whole
//! files through this trait. This enables:
//! - The OS filesystem for real use
//! - An in-memory filesystem for tests and throwaway stores

use std::path::Path;

use crate::error::ShelfResult;

/// Whole-file storage used by [`crate::Store`].
///
/// There is no partial update, append or locking: every write replaces the
/// file, and two stores pointed at one path simply overwrite each other.
pub trait FileSystem: Send + Sync {
    /// Returns true if a file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Creates `dir` and any missing parents. Succeeds if it already exists.
    fn ensure_directory(&self, dir: &Path) -> ShelfResult<()>;

    /// Reads the whole file.
    fn read_all(&self, path: &Path) -> ShelfResult<Vec<u8>>;

    /// Replaces the file's contents with `bytes`, creating it if needed.
    fn write_all(&self, path: &Path, bytes: &[u8]) -> ShelfResult<()>;
}
