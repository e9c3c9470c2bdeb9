//! Error types for shelfdb.
//!
//! All errors in shelfdb are strongly typed using thiserror.
//! This enables pattern matching on specific error conditions
//! and provides clear error messages.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while encoding or decoding a document.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("{0}")]
    Custom(String),
}

impl CodecError {
    /// Creates a codec error with a free-form message, for use by custom codecs.
    #[must_use]
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

/// A custom codec failed its construction-time self-test.
#[derive(Debug, Error)]
#[error("Custom codec rejected: {reason}")]
pub struct CodecRejected {
    /// Why the probe round-trip failed.
    pub reason: String,
}

/// Top-level error type for shelfdb.
#[derive(Debug, Error)]
pub enum ShelfError {
    #[error("Invalid configuration: {message}")]
    Config {
        message: String,
    },

    #[error("Invalid key: '{key}'")]
    InvalidKey {
        key: String,
    },

    #[error("Field '{key}' is not an array")]
    NotArray {
        key: String,
    },

    #[error("Field '{key}' is not an object or array")]
    NotComposite {
        key: String,
    },

    #[error("Data is not the same shape as the template, missing keys: {}", .missing.join(", "))]
    ShapeMismatch {
        missing: Vec<String>,
    },

    #[error("Failed to decode document: {0}")]
    Decode(#[source] CodecError),

    #[error("Failed to encode document: {0}")]
    Encode(#[source] CodecError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ShelfError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid-key error.
    #[must_use]
    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey { key: key.into() }
    }

    /// Wraps an I/O error with the path it happened on.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Returns true if this is an invalid-key error.
    #[must_use]
    pub const fn is_invalid_key(&self) -> bool {
        matches!(self, Self::InvalidKey { .. })
    }

    /// Returns true if a put targeted a non-array field.
    #[must_use]
    pub const fn is_not_array(&self) -> bool {
        matches!(self, Self::NotArray { .. })
    }

    /// Returns true if this is a reset shape mismatch.
    #[must_use]
    pub const fn is_shape_mismatch(&self) -> bool {
        matches!(self, Self::ShapeMismatch { .. })
    }

    /// Returns true if decoding persisted bytes failed.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Returns true if this is a filesystem error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Result type alias for shelfdb operations.
pub type ShelfResult<T> = Result<T, ShelfError>;
