//! Document codecs.
//!
//! A codec turns the in-memory document into the bytes written to disk and
//! back. Three strategies exist:
//! - Plain: pretty-printed JSON, 4-space indent
//! - Binary: the compact JSON bytes written as a JSON array of byte values
//! - Custom: caller-supplied encode/decode closures, self-tested before use
//!
//! The binary form only hides the text from casual reading; it is neither
//! compression nor encryption.

use std::fmt;

use serde::Serialize;
use serde_json::{json, ser::PrettyFormatter, Map, Value};

use crate::error::{CodecError, CodecRejected};
use crate::template::is_same;

/// File extension used by [`PlainCodec`].
pub const PLAIN_EXTENSION: &str = "json";

/// File extension used by [`BinaryCodec`].
pub const BINARY_EXTENSION: &str = "NDB";

/// Default file extension for a [`CustomCodec`].
pub const CUSTOM_EXTENSION: &str = "cst";

/// Indentation of the plain encoding.
const INDENT: &[u8] = b"    ";

/// Encodes and decodes whole documents.
pub trait Codec: Send + Sync {
    /// Serializes a document to the bytes persisted on disk.
    fn encode(&self, document: &Value) -> Result<Vec<u8>, CodecError>;

    /// Parses persisted bytes back into a document.
    fn decode(&self, bytes: &[u8]) -> Result<Value, CodecError>;

    /// File extension appended to the configured path, without the dot.
    fn extension(&self) -> &str;

    /// Whether a decode failure should self-heal instead of surfacing.
    fn reset_on_decode_error(&self) -> bool {
        false
    }
}

fn empty_document() -> Value {
    Value::Object(Map::new())
}

fn to_pretty_json(document: &Value) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
    document.serialize(&mut ser)?;
    Ok(out)
}

/// Human-readable JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCodec;

impl Codec for PlainCodec {
    fn encode(&self, document: &Value) -> Result<Vec<u8>, CodecError> {
        to_pretty_json(document)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, CodecError> {
        // An empty file is an empty document.
        if bytes.is_empty() {
            return Ok(empty_document());
        }
        Ok(serde_json::from_slice(bytes)?)
    }

    fn extension(&self) -> &str {
        PLAIN_EXTENSION
    }
}

/// JSON text wrapped as an array of byte values.
///
/// Format:
/// ```text
/// [123,34,110,97,109,101,34,58,34,34,125]   <- bytes of {"name":""}
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCodec;

impl Codec for BinaryCodec {
    fn encode(&self, document: &Value) -> Result<Vec<u8>, CodecError> {
        let text = serde_json::to_vec(document)?;
        Ok(serde_json::to_vec(&text)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, CodecError> {
        if bytes.is_empty() {
            return Ok(empty_document());
        }
        let raw: Vec<u8> = serde_json::from_slice(bytes)?;
        if raw.is_empty() {
            return Ok(empty_document());
        }
        let text = String::from_utf8(raw)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn extension(&self) -> &str {
        BINARY_EXTENSION
    }
}

type EncodeFn = Box<dyn Fn(&Value) -> Result<Vec<u8>, CodecError> + Send + Sync>;
type DecodeFn = Box<dyn Fn(&[u8]) -> Result<Value, CodecError> + Send + Sync>;

/// Caller-supplied codec.
///
/// # Example
/// ```
/// use shelfdb::storage::CustomCodec;
///
/// let codec = CustomCodec::new(
///     |doc| Ok(serde_json::to_vec(doc)?),
///     |bytes| Ok(serde_json::from_slice(bytes)?),
/// )
/// .with_file_extension("dat")
/// .with_reset_on_decode_error(true);
/// ```
pub struct CustomCodec {
    encode: EncodeFn,
    decode: DecodeFn,
    reset_on_decode_error: bool,
    file_extension: String,
}

impl CustomCodec {
    /// Creates a codec from an encode and a decode function.
    pub fn new<E, D>(encode: E, decode: D) -> Self
    where
        E: Fn(&Value) -> Result<Vec<u8>, CodecError> + Send + Sync + 'static,
        D: Fn(&[u8]) -> Result<Value, CodecError> + Send + Sync + 'static,
    {
        Self {
            encode: Box::new(encode),
            decode: Box::new(decode),
            reset_on_decode_error: false,
            file_extension: CUSTOM_EXTENSION.to_string(),
        }
    }

    /// Sets whether a failed decode resets the store instead of erroring.
    #[must_use]
    pub fn with_reset_on_decode_error(mut self, reset: bool) -> Self {
        self.reset_on_decode_error = reset;
        self
    }

    /// Sets the file extension (without the dot).
    #[must_use]
    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }
}

impl fmt::Debug for CustomCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomCodec")
            .field("reset_on_decode_error", &self.reset_on_decode_error)
            .field("file_extension", &self.file_extension)
            .finish_non_exhaustive()
    }
}

impl Codec for CustomCodec {
    fn encode(&self, document: &Value) -> Result<Vec<u8>, CodecError> {
        (self.encode)(document)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, CodecError> {
        (self.decode)(bytes)
    }

    fn extension(&self) -> &str {
        &self.file_extension
    }

    fn reset_on_decode_error(&self) -> bool {
        self.reset_on_decode_error
    }
}

/// A custom codec that passed [`validate_codec`].
#[derive(Debug)]
pub struct ValidatedCodec(CustomCodec);

impl ValidatedCodec {
    /// Unwraps the validated codec.
    #[must_use]
    pub fn into_inner(self) -> CustomCodec {
        self.0
    }
}

/// The fixed document a custom codec must round-trip.
#[must_use]
pub fn probe_document() -> Value {
    json!({
        "string": "probe",
        "number": 42,
        "float": 1.5,
        "flag": true,
        "list": [1, "two", { "three": 3 }],
        "nested": { "key": "value" }
    })
}

/// Runs the probe document through `codec` and checks that every top-level
/// probe key survives the round trip.
///
/// # Errors
/// Returns [`CodecRejected`] if encoding or decoding fails, or if the decoded
/// document lacks any probe key.
pub fn validate_codec(codec: CustomCodec) -> Result<ValidatedCodec, CodecRejected> {
    let probe = probe_document();

    let bytes = codec.encode(&probe).map_err(|e| CodecRejected {
        reason: format!("encode failed: {e}"),
    })?;
    let decoded = codec.decode(&bytes).map_err(|e| CodecRejected {
        reason: format!("decode failed: {e}"),
    })?;

    if !is_same(&decoded, &probe) {
        return Err(CodecRejected {
            reason: "decoded probe is missing top-level keys".to_string(),
        });
    }

    Ok(ValidatedCodec(codec))
}
