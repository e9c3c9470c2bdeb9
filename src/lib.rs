//! # shelfdb - an embedded single-file JSON document store
//!
//! shelfdb keeps one JSON document in memory and persists it to one file.
//! The document is read and written through single-key `get`/`set` calls and
//! a dedup-aware `put` for array fields, and is kept in the shape of a
//! caller-supplied template.
//!
//! ## Core Concepts
//!
//! - **Template**: the expected top-level keys with their default values
//! - **Reconciliation**: shallow fill of missing template keys on open
//! - **Codec**: how the document becomes bytes (plain JSON, byte-array
//!   wrapped JSON, or a self-tested custom codec)
//! - **View**: a live handle on a nested object or array of the document
//!
//! ## Usage
//!
//! ```rust,no_run
//! use serde_json::json;
//! use shelfdb::{Store, StoreConfig};
//!
//! let template = json!({
//!     "name": "",
//!     "location": { "continent": "", "house_number": 0 },
//!     "notes": []
//! });
//!
//! let mut store = Store::open(StoreConfig::new(template).with_file_path("data/profile"))?;
//!
//! store.set("name", "John")?.put("notes", "note 1")?;
//! store.put("notes", "note 1")?; // duplicate, skipped
//! store.view("location")?.set("house_number", 10)?;
//!
//! assert_eq!(store.get("notes")?, &json!(["note 1"]));
//! # Ok::<(), shelfdb::ShelfError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod merge;
pub mod storage;
pub mod store;
pub mod template;
pub mod view;

// Re-export primary types at crate root for convenience
pub use config::{SerializationMode, StoreConfig, DEFAULT_FILE_PATH};
pub use error::{CodecError, CodecRejected, ShelfError, ShelfResult};
pub use storage::{
    validate_codec, BinaryCodec, Codec, CustomCodec, FileSystem, MemoryFileSystem, OsFileSystem,
    PlainCodec, ValidatedCodec,
};
pub use store::Store;
pub use template::{is_same, reconcile};
pub use view::DocumentView;
