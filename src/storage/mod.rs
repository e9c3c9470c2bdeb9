//! Storage layer for shelfdb.
//!
//! Two seams live here: the [`FileSystem`] the store reads and writes whole
//! files through, and the [`Codec`] that maps documents to bytes.

mod codec;
mod memory;
mod os;
mod traits;

pub use codec::{
    probe_document, validate_codec, BinaryCodec, Codec, CustomCodec, PlainCodec, ValidatedCodec,
    BINARY_EXTENSION, CUSTOM_EXTENSION, PLAIN_EXTENSION,
};
pub use memory::MemoryFileSystem;
pub use os::OsFileSystem;
pub use traits::FileSystem;
