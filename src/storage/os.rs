//! Filesystem backed by `std::fs`.

use std::fs;
use std::path::Path;

use crate::error::{ShelfError, ShelfResult};
use crate::storage::traits::FileSystem;

/// The operating system's filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn ensure_directory(&self, dir: &Path) -> ShelfResult<()> {
        if dir.as_os_str().is_empty() {
            return Ok(());
        }
        fs::create_dir_all(dir).map_err(|e| ShelfError::io(dir, e))
    }

    fn read_all(&self, path: &Path) -> ShelfResult<Vec<u8>> {
        fs::read(path).map_err(|e| ShelfError::io(path, e))
    }

    fn write_all(&self, path: &Path, bytes: &[u8]) -> ShelfResult<()> {
        fs::write(path, bytes).map_err(|e| ShelfError::io(path, e))
    }
}
