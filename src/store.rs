//! The store controller.
//!
//! A [`Store`] owns one JSON document and the file it is persisted to. It is
//! either *persistent* (the file is written on open and, with autosave, after
//! every mutation) or *cache-only* (nothing is written until [`Store::save`]).
//!
//! # Lifecycle
//!
//! ```text
//!                   ┌──────────────┐
//!   open ──────────►│ validate cfg │
//!                   └──────┬───────┘
//!                          ↓
//!                   ┌──────────────┐   custom codec fails its self-test
//!                   │ select codec │ ─────────────► plain codec, flagged
//!                   └──────┬───────┘
//!             cache_only   │   persistent
//!          ┌───────────────┴──────────────┐
//!          ↓                              ↓
//!   load if present,               ensure directory;
//!   reconcile, no write            load + reconcile or seed; save
//! ```

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::{SerializationMode, StoreConfig};
use crate::error::{ShelfError, ShelfResult};
use crate::storage::{
    validate_codec, BinaryCodec, Codec, FileSystem, OsFileSystem, PlainCodec,
};
use crate::template::{missing_keys, reconcile};
use crate::view::{check_viewable, get_in, put_in, set_in, DocumentView};

fn select_codec(mode: SerializationMode) -> (Box<dyn Codec>, bool) {
    let codec: Box<dyn Codec> = match mode {
        SerializationMode::Plain => Box::new(PlainCodec),
        SerializationMode::Binary => Box::new(BinaryCodec),
        SerializationMode::Custom(custom) => match validate_codec(custom) {
            Ok(validated) => Box::new(validated.into_inner()),
            Err(rejected) => {
                warn!(
                    target: "shelfdb::codec",
                    reason = %rejected.reason,
                    "custom codec failed its self-test; falling back to plain JSON"
                );
                return (Box::new(PlainCodec), true);
            }
        },
    };
    (codec, false)
}

fn with_extension(file_path: &Path, extension: &str) -> PathBuf {
    if extension.is_empty() {
        return file_path.to_path_buf();
    }
    let mut name = OsString::from(file_path.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

fn empty_document() -> Value {
    Value::Object(Map::new())
}

/// A single JSON document persisted to a single file.
///
/// # Example
/// ```no_run
/// use serde_json::json;
/// use shelfdb::{Store, StoreConfig};
///
/// let template = json!({ "name": "", "notes": [] });
/// let mut store = Store::open(StoreConfig::new(template).with_file_path("data/profile"))?;
///
/// store.set("name", "John")?.put("notes", "note 1")?;
/// assert_eq!(store.get("name")?, "John");
/// # Ok::<(), shelfdb::ShelfError>(())
/// ```
pub struct Store<F: FileSystem = OsFileSystem> {
    fs: F,
    codec: Box<dyn Codec>,
    template: Value,
    document: Value,
    path: PathBuf,
    auto_save: bool,
    cache_only: bool,
    codec_rejected: bool,
}

impl<F: FileSystem> fmt::Debug for Store<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.path)
            .field("extension", &self.codec.extension())
            .field("auto_save", &self.auto_save)
            .field("cache_only", &self.cache_only)
            .field("codec_rejected", &self.codec_rejected)
            .finish_non_exhaustive()
    }
}

impl Store<OsFileSystem> {
    /// Opens (or creates) a store on the local filesystem.
    ///
    /// # Errors
    /// - [`ShelfError::Config`] if the template is not a JSON object
    /// - [`ShelfError::Decode`] if an existing file cannot be decoded
    /// - [`ShelfError::Io`] on filesystem failures
    pub fn open(config: StoreConfig) -> ShelfResult<Self> {
        Self::open_with(config, OsFileSystem)
    }
}

impl<F: FileSystem> Store<F> {
    /// Opens (or creates) a store on the given filesystem.
    ///
    /// In persistent mode the file is always written once before this
    /// returns: seeded from the template if it did not exist, or healed to
    /// the template's top-level shape if it did.
    ///
    /// # Errors
    /// Same as [`Store::open`].
    pub fn open_with(config: StoreConfig, fs: F) -> ShelfResult<Self> {
        let StoreConfig {
            template,
            auto_save,
            mode,
            cache_only,
            file_path,
        } = config.validate()?;

        let (codec, codec_rejected) = select_codec(mode);
        let path = with_extension(&file_path, codec.extension());

        let mut store = Self {
            fs,
            codec,
            document: template.clone(),
            template,
            path,
            auto_save,
            cache_only,
            codec_rejected,
        };

        if store.cache_only {
            if store.fs.exists(&store.path) {
                store.load()?;
            } else {
                store.document = empty_document();
            }
            store.document = reconcile(&store.document, &store.template);
            debug!(target: "shelfdb::store", path = %store.path.display(), "opened cache-only store");
            return Ok(store);
        }

        if let Some(dir) = store.path.parent() {
            store.fs.ensure_directory(dir)?;
        }

        if store.fs.exists(&store.path) {
            store.load()?;
            store.document = reconcile(&store.document, &store.template);
        } else {
            info!(target: "shelfdb::store", path = %store.path.display(), "seeding new store from template");
        }
        store.save()?;

        Ok(store)
    }

    /// Location of the backing file, extension included.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Points the store at another file in the same directory.
    ///
    /// `filename` is used verbatim; no extension is appended. Nothing is read
    /// or written until the next load or save.
    pub fn set_filename(&mut self, filename: impl AsRef<Path>) {
        let dir = self.path.parent().map(Path::to_path_buf).unwrap_or_default();
        self.path = dir.join(filename);
    }

    /// File extension of the active codec.
    #[must_use]
    pub fn extension(&self) -> &str {
        self.codec.extension()
    }

    /// The current template.
    #[must_use]
    pub fn template(&self) -> &Value {
        &self.template
    }

    /// The whole document.
    #[must_use]
    pub fn document(&self) -> &Value {
        &self.document
    }

    pub(crate) fn document_mut(&mut self) -> &mut Value {
        &mut self.document
    }

    /// True if the store never writes on its own.
    #[must_use]
    pub fn is_cache_only(&self) -> bool {
        self.cache_only
    }

    /// True if mutations are persisted immediately.
    #[must_use]
    pub fn auto_save(&self) -> bool {
        self.auto_save
    }

    /// Turns autosave on or off. Cache-only stores keep autosave off.
    pub fn set_auto_save(&mut self, auto_save: bool) {
        self.auto_save = auto_save && !self.cache_only;
    }

    /// True if a configured custom codec failed its self-test and the store
    /// is using plain JSON instead.
    #[must_use]
    pub fn codec_rejected(&self) -> bool {
        self.codec_rejected
    }

    pub(crate) fn persist_if_auto(&self) -> ShelfResult<()> {
        if self.auto_save {
            self.save()?;
        }
        Ok(())
    }

    /// Reads `key` from the root; an empty key returns the whole document.
    ///
    /// # Errors
    /// [`ShelfError::InvalidKey`] if the key is absent.
    pub fn get(&self, key: &str) -> ShelfResult<&Value> {
        get_in(&self.document, key)
    }

    /// Opens a live view on the object or array at `key` (the root for an
    /// empty key).
    ///
    /// # Errors
    /// [`ShelfError::InvalidKey`] if absent, [`ShelfError::NotComposite`] if scalar.
    pub fn view(&mut self, key: &str) -> ShelfResult<DocumentView<'_, F>> {
        check_viewable(&self.document, key)?;
        let path = if key.is_empty() {
            Vec::new()
        } else {
            vec![key.to_string()]
        };
        Ok(DocumentView::new(self, path))
    }

    /// Assigns `value` at `key`, replacing any previous value, then autosaves.
    ///
    /// # Errors
    /// [`ShelfError::InvalidKey`] for an empty or whitespace key; save errors
    /// propagate.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> ShelfResult<&mut Self> {
        set_in(&mut self.document, key, value.into())?;
        self.persist_if_auto()?;
        Ok(self)
    }

    /// Appends `value` to the array at `key` unless a matching element exists.
    ///
    /// Objects match an element holding all of their keys with equal values;
    /// scalars match an equal element.
    ///
    /// # Errors
    /// [`ShelfError::NotArray`] if `key` is missing or not an array.
    pub fn put(&mut self, key: &str, value: impl Into<Value>) -> ShelfResult<&mut Self> {
        self.put_with(key, value.into(), false)
    }

    /// Appends `value` to the array at `key`, duplicates included.
    ///
    /// # Errors
    /// [`ShelfError::NotArray`] if `key` is missing or not an array.
    pub fn put_forced(&mut self, key: &str, value: impl Into<Value>) -> ShelfResult<&mut Self> {
        self.put_with(key, value.into(), true)
    }

    fn put_with(&mut self, key: &str, value: Value, force: bool) -> ShelfResult<&mut Self> {
        put_in(&mut self.document, key, value, force)?;
        self.persist_if_auto()?;
        Ok(self)
    }

    /// Replaces the document, and possibly the template.
    ///
    /// With `overwrite`, both template and document become `data`, whatever
    /// its shape, and the call always succeeds. Without
    /// it, `data` only serves as a shape probe: it must carry every top-level
    /// template key, and the document is reset to a fresh copy of the
    /// *template*, not of `data`. Reset does not save.
    ///
    /// # Errors
    /// [`ShelfError::ShapeMismatch`] if not overwriting and `data` lacks
    /// template keys; the store is left untouched.
    pub fn reset(&mut self, data: Value, overwrite: bool) -> ShelfResult<&mut Self> {
        if overwrite {
            self.replace_template(data);
            return Ok(self);
        }

        let missing = missing_keys(&data, &self.template);
        if !missing.is_empty() {
            warn!(
                target: "shelfdb::store",
                missing = ?missing,
                "reset data is not the same shape as the template"
            );
            return Err(ShelfError::ShapeMismatch { missing });
        }

        self.document = self.template.clone();
        Ok(self)
    }

    fn replace_template(&mut self, data: Value) {
        self.template = data.clone();
        self.document = data;
    }

    /// Encodes the document and overwrites the backing file.
    ///
    /// # Errors
    /// [`ShelfError::Encode`] if the codec fails, [`ShelfError::Io`] if the
    /// write fails.
    pub fn save(&self) -> ShelfResult<()> {
        let bytes = self.codec.encode(&self.document).map_err(ShelfError::Encode)?;
        self.fs.write_all(&self.path, &bytes)?;
        debug!(target: "shelfdb::store", path = %self.path.display(), bytes = bytes.len(), "saved document");
        Ok(())
    }

    /// Replaces the document with the decoded contents of the backing file.
    ///
    /// The loaded document is not reconciled. If decoding fails and the
    /// codec asks for it, the store instead resets itself to the document it
    /// currently holds, template included.
    ///
    /// # Errors
    /// [`ShelfError::Io`] if the read fails, [`ShelfError::Decode`] if the
    /// bytes cannot be decoded and no self-heal applies.
    pub fn load(&mut self) -> ShelfResult<&mut Self> {
        let bytes = self.fs.read_all(&self.path)?;
        match self.codec.decode(&bytes) {
            Ok(document) => {
                debug!(target: "shelfdb::store", path = %self.path.display(), bytes = bytes.len(), "loaded document");
                self.document = document;
            }
            Err(err) if self.codec.reset_on_decode_error() => {
                warn!(
                    target: "shelfdb::store",
                    path = %self.path.display(),
                    error = %err,
                    "decode failed; resetting to the in-memory document"
                );
                let current = self.document.clone();
                self.replace_template(current);
            }
            Err(err) => return Err(ShelfError::Decode(err)),
        }
        Ok(self)
    }
}
