//! Store configuration.
//!
//! [`StoreConfig::default`] is the single source of fallback values; a JSON
//! configuration record only overrides the fields it actually sets.

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{ShelfError, ShelfResult};
use crate::storage::CustomCodec;

/// Path used when none is configured, relative to the working directory.
pub const DEFAULT_FILE_PATH: &str = "db";

/// How the document is serialized on disk.
#[derive(Debug, Default)]
pub enum SerializationMode {
    /// Pretty-printed JSON (`.json`).
    #[default]
    Plain,
    /// JSON bytes wrapped as a byte-value array (`.NDB`).
    Binary,
    /// Caller-supplied codec, self-tested at open.
    Custom(CustomCodec),
}

/// Configuration for a [`crate::Store`].
#[derive(Debug)]
pub struct StoreConfig {
    /// Expected top-level shape and default values. Must be a JSON object.
    pub template: Value,
    /// Persist after every successful `set`/`put`.
    pub auto_save: bool,
    /// On-disk serialization.
    pub mode: SerializationMode,
    /// Keep the document in memory only; nothing is written until `save()`.
    pub cache_only: bool,
    /// File path without extension; the codec's extension is appended.
    pub file_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            template: Value::Object(Map::new()),
            auto_save: true,
            mode: SerializationMode::Plain,
            cache_only: false,
            file_path: PathBuf::from(DEFAULT_FILE_PATH),
        }
    }
}

/// JSON configuration record; every field is optional and null counts as unset.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawConfig {
    #[serde(alias = "templateData")]
    data: Option<Value>,
    auto_save: Option<bool>,
    as_binary: Option<bool>,
    cache: Option<bool>,
    file_path: Option<PathBuf>,
}

impl StoreConfig {
    /// Creates a configuration with default settings for the given template.
    #[must_use]
    pub fn new(template: Value) -> Self {
        Self {
            template,
            ..Self::default()
        }
    }

    /// Builds a configuration from a JSON record such as
    /// `{"data": {...}, "autoSave": true, "asBinary": false, "cache": false, "filePath": "db"}`.
    ///
    /// Missing or null fields fall back to [`StoreConfig::default`]; unknown
    /// fields are ignored.
    ///
    /// # Errors
    /// Returns [`ShelfError::Config`] if `record` is not an object or a field
    /// has the wrong type.
    pub fn from_json(record: &Value) -> ShelfResult<Self> {
        if !record.is_object() {
            return Err(ShelfError::config("configuration has to be an object"));
        }
        let raw = RawConfig::deserialize(record)
            .map_err(|e| ShelfError::config(format!("invalid configuration record: {e}")))?;

        let defaults = Self::default();
        let mode = if raw.as_binary.unwrap_or(false) {
            SerializationMode::Binary
        } else {
            SerializationMode::Plain
        };

        Self {
            template: raw.data.unwrap_or(defaults.template),
            auto_save: raw.auto_save.unwrap_or(defaults.auto_save),
            mode,
            cache_only: raw.cache.unwrap_or(defaults.cache_only),
            file_path: raw.file_path.unwrap_or(defaults.file_path),
        }
        .validate()
    }

    /// Sets whether mutations persist immediately.
    #[must_use]
    pub fn with_auto_save(mut self, auto_save: bool) -> Self {
        self.auto_save = auto_save;
        self
    }

    /// Selects the serialization mode.
    #[must_use]
    pub fn with_mode(mut self, mode: SerializationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for [`SerializationMode::Binary`].
    #[must_use]
    pub fn binary(self) -> Self {
        self.with_mode(SerializationMode::Binary)
    }

    /// Shorthand for [`SerializationMode::Custom`].
    #[must_use]
    pub fn with_codec(self, codec: CustomCodec) -> Self {
        self.with_mode(SerializationMode::Custom(codec))
    }

    /// Sets cache-only mode.
    #[must_use]
    pub fn with_cache_only(mut self, cache_only: bool) -> Self {
        self.cache_only = cache_only;
        self
    }

    /// Sets the file path (without extension).
    #[must_use]
    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = path.into();
        self
    }

    /// Checks the configuration and applies the cache-mode overrides.
    ///
    /// Cache mode turns autosave off and drops a custom codec in favour of
    /// plain JSON.
    ///
    /// # Errors
    /// Returns [`ShelfError::Config`] if the template is not a JSON object.
    pub fn validate(mut self) -> ShelfResult<Self> {
        if !self.template.is_object() {
            return Err(ShelfError::config("template data has to be an object"));
        }

        if self.cache_only {
            self.auto_save = false;
            if matches!(self.mode, SerializationMode::Custom(_)) {
                self.mode = SerializationMode::Plain;
            }
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let cfg = StoreConfig::default();
        assert!(cfg.auto_save);
        assert!(!cfg.cache_only);
        assert!(matches!(cfg.mode, SerializationMode::Plain));
        assert_eq!(cfg.file_path, PathBuf::from("db"));
        assert_eq!(cfg.template, json!({}));
    }

    #[test]
    fn test_validate_rejects_non_object_template() {
        let err = StoreConfig::new(json!([1, 2])).validate().unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_cache_mode_overrides() {
        let codec = CustomCodec::new(|_| Ok(Vec::new()), |_| Ok(Value::Null));
        let cfg = StoreConfig::new(json!({}))
            .with_codec(codec)
            .with_cache_only(true)
            .validate()
            .unwrap();

        assert!(!cfg.auto_save);
        assert!(matches!(cfg.mode, SerializationMode::Plain));
    }

    #[test]
    fn test_cache_mode_keeps_binary() {
        let cfg = StoreConfig::new(json!({}))
            .binary()
            .with_cache_only(true)
            .validate()
            .unwrap();
        assert!(matches!(cfg.mode, SerializationMode::Binary));
    }

    #[test]
    fn test_from_json_full_record() {
        let cfg = StoreConfig::from_json(&json!({
            "data": { "name": "" },
            "autoSave": false,
            "asBinary": true,
            "cache": false,
            "filePath": "/tmp/shelf/settings"
        }))
        .unwrap();

        assert_eq!(cfg.template, json!({ "name": "" }));
        assert!(!cfg.auto_save);
        assert!(matches!(cfg.mode, SerializationMode::Binary));
        assert_eq!(cfg.file_path, PathBuf::from("/tmp/shelf/settings"));
    }

    #[test]
    fn test_from_json_missing_and_null_fields_use_defaults() {
        let cfg = StoreConfig::from_json(&json!({
            "templateData": { "a": 1 },
            "autoSave": null,
            "somethingElse": 3
        }))
        .unwrap();

        assert_eq!(cfg.template, json!({ "a": 1 }));
        assert!(cfg.auto_save);
        assert!(matches!(cfg.mode, SerializationMode::Plain));
        assert_eq!(cfg.file_path, PathBuf::from("db"));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(StoreConfig::from_json(&json!("config")).unwrap_err().is_config());
        assert!(StoreConfig::from_json(&json!(null)).unwrap_err().is_config());
    }

    #[test]
    fn test_from_json_rejects_wrong_field_type() {
        let err = StoreConfig::from_json(&json!({ "autoSave": "yes" })).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_from_json_cache_forces_autosave_off() {
        let cfg = StoreConfig::from_json(&json!({ "cache": true, "autoSave": true })).unwrap();
        assert!(cfg.cache_only);
        assert!(!cfg.auto_save);
    }
}
