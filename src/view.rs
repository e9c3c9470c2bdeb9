//! Path accessor / mutator.
//!
//! A key is a single opaque segment: `"user.name"` addresses the field named
//! `user.name`, never a nested `name` inside `user`. Objects are addressed by
//! key and arrays by decimal index.
//!
//! [`DocumentView`] is a live handle on a nested object or array. It borrows
//! the owning [`Store`] mutably and remembers the key path of its node, so
//! every write lands in the store's document in place and goes through the
//! store's autosave.

use std::cmp::Ordering;
use std::fmt;

use serde_json::Value;

use crate::error::{ShelfError, ShelfResult};
use crate::merge::put_into;
use crate::storage::{FileSystem, OsFileSystem};
use crate::store::Store;

/// Canonical decimal index: digits only, no leading zero unless it is `"0"`.
fn parse_index(key: &str) -> Option<usize> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse().ok()
}

fn child<'v>(node: &'v Value, key: &str) -> Option<&'v Value> {
    match node {
        Value::Object(map) => map.get(key),
        Value::Array(seq) => parse_index(key).and_then(|i| seq.get(i)),
        _ => None,
    }
}

fn child_mut<'v>(node: &'v mut Value, key: &str) -> Option<&'v mut Value> {
    match node {
        Value::Object(map) => map.get_mut(key),
        Value::Array(seq) => parse_index(key).and_then(|i| seq.get_mut(i)),
        _ => None,
    }
}

fn is_composite(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

/// Looks up `key` in `node`. An empty key yields `node` itself.
pub(crate) fn get_in<'v>(node: &'v Value, key: &str) -> ShelfResult<&'v Value> {
    if key.is_empty() {
        return Ok(node);
    }
    child(node, key).ok_or_else(|| ShelfError::invalid_key(key))
}

/// Assigns `value` at `key`, replacing whatever was there.
///
/// Array nodes take an index below the length, or exactly the length to
/// append. Anything further out is an invalid key.
pub(crate) fn set_in(node: &mut Value, key: &str, value: Value) -> ShelfResult<()> {
    if key.trim().is_empty() {
        return Err(ShelfError::invalid_key(key));
    }
    match node {
        Value::Object(map) => {
            map.insert(key.to_string(), value);
        }
        Value::Array(seq) => {
            let index = parse_index(key).ok_or_else(|| ShelfError::invalid_key(key))?;
            match index.cmp(&seq.len()) {
                Ordering::Less => seq[index] = value,
                Ordering::Equal => seq.push(value),
                Ordering::Greater => return Err(ShelfError::invalid_key(key)),
            }
        }
        _ => {
            return Err(ShelfError::NotComposite {
                key: key.to_string(),
            })
        }
    }
    Ok(())
}

/// Merges `value` into the array at `key`. Returns whether it was appended.
pub(crate) fn put_in(node: &mut Value, key: &str, value: Value, force: bool) -> ShelfResult<bool> {
    match child_mut(node, key) {
        Some(Value::Array(seq)) => Ok(put_into(seq, value, force)),
        _ => Err(ShelfError::NotArray {
            key: key.to_string(),
        }),
    }
}

fn stale(path: &[String]) -> ShelfError {
    ShelfError::invalid_key(path.join("/"))
}

fn resolve<'v>(root: &'v Value, path: &[String]) -> ShelfResult<&'v Value> {
    path.iter()
        .try_fold(root, |node, key| child(node, key).ok_or_else(|| stale(path)))
}

fn resolve_mut<'v>(root: &'v mut Value, path: &[String]) -> ShelfResult<&'v mut Value> {
    let mut node = root;
    for key in path {
        node = child_mut(node, key).ok_or_else(|| stale(path))?;
    }
    Ok(node)
}

/// Checks that `key` in `node` names an object or array a view can wrap.
pub(crate) fn check_viewable(node: &Value, key: &str) -> ShelfResult<()> {
    let target = get_in(node, key)?;
    if is_composite(target) {
        Ok(())
    } else {
        Err(ShelfError::NotComposite {
            key: key.to_string(),
        })
    }
}

/// Mutation-forwarding handle on a nested object or array of a [`Store`].
///
/// A view addresses a key path, not a particular node, and walks that path
/// from the document root on every call. While a view is alive it holds the
/// store's mutable borrow, so none of its ancestors can be replaced under it.
/// Once an ancestor has been replaced with `set`, a view opened on the same
/// path wraps whatever sits there now, even if it is unrelated data. Only a
/// path that no longer resolves fails, with [`ShelfError::InvalidKey`].
///
/// # Example
/// ```rust,ignore
/// let mut location = store.view("location")?;
/// location.set("house_number", 10)?;
/// assert_eq!(location.get("house_number")?, 10);
/// ```
pub struct DocumentView<'s, F: FileSystem = OsFileSystem> {
    store: &'s mut Store<F>,
    path: Vec<String>,
}

impl<F: FileSystem> fmt::Debug for DocumentView<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentView")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl<'s, F: FileSystem> DocumentView<'s, F> {
    pub(crate) fn new(store: &'s mut Store<F>, path: Vec<String>) -> Self {
        Self { store, path }
    }

    /// Key path from the document root to this node.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The node this view wraps.
    ///
    /// # Errors
    /// [`ShelfError::InvalidKey`] if the node no longer exists.
    pub fn value(&self) -> ShelfResult<&Value> {
        resolve(self.store.document(), &self.path)
    }

    /// Reads `key` from this node; an empty key returns the node itself.
    ///
    /// # Errors
    /// [`ShelfError::InvalidKey`] if the key is absent or the view is stale.
    pub fn get(&self, key: &str) -> ShelfResult<&Value> {
        get_in(self.value()?, key)
    }

    /// Opens a view on the nested object or array at `key`.
    ///
    /// # Errors
    /// [`ShelfError::InvalidKey`] if absent, [`ShelfError::NotComposite`] if scalar.
    pub fn view(&mut self, key: &str) -> ShelfResult<DocumentView<'_, F>> {
        check_viewable(self.value()?, key)?;
        let mut path = self.path.clone();
        if !key.is_empty() {
            path.push(key.to_string());
        }
        Ok(DocumentView::new(&mut *self.store, path))
    }

    /// Assigns `value` at `key` in this node, then autosaves.
    ///
    /// # Errors
    /// [`ShelfError::InvalidKey`] for a blank key or stale view; save errors
    /// propagate.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> ShelfResult<&mut Self> {
        let node = resolve_mut(self.store.document_mut(), &self.path)?;
        set_in(node, key, value.into())?;
        self.store.persist_if_auto()?;
        Ok(self)
    }

    /// Appends `value` to the array at `key` unless an equal element exists.
    ///
    /// # Errors
    /// [`ShelfError::NotArray`] if `key` is not an array.
    pub fn put(&mut self, key: &str, value: impl Into<Value>) -> ShelfResult<&mut Self> {
        self.put_with(key, value.into(), false)
    }

    /// Appends `value` to the array at `key` even if it is a duplicate.
    ///
    /// # Errors
    /// [`ShelfError::NotArray`] if `key` is not an array.
    pub fn put_forced(&mut self, key: &str, value: impl Into<Value>) -> ShelfResult<&mut Self> {
        self.put_with(key, value.into(), true)
    }

    fn put_with(&mut self, key: &str, value: Value, force: bool) -> ShelfResult<&mut Self> {
        let node = resolve_mut(self.store.document_mut(), &self.path)?;
        put_in(node, key, value, force)?;
        self.store.persist_if_auto()?;
        Ok(self)
    }
}
