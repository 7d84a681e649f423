//! Typed, pointer-addressed field access.
//!
//! Every accessor fails closed: a path that does not resolve, resolves to
//! `null`, or resolves to a value of another JSON type yields `None`. A
//! present-but-empty value (`""`, `[]`, `{}`) is returned as such, so callers
//! can tell "not offered" apart from "offered and empty".

use serde_json::Value;

use crate::error::{BackendError, BackendResult};
use crate::pointer::JsonPointer;

/// A Rust type that can be extracted from a JSON node.
pub trait FieldValue: Sized {
    /// JSON kind expected by this type, for diagnostics.
    const KIND: &'static str;

    /// Convert the node, or `None` if it has the wrong shape.
    fn from_json(value: &Value) -> Option<Self>;
}

impl FieldValue for i64 {
    const KIND: &'static str = "a 64-bit integer";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl FieldValue for String {
    const KIND: &'static str = "a string";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

/// An object rendered back to compact JSON text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectText(pub String);

impl FieldValue for ObjectText {
    const KIND: &'static str = "an object";

    fn from_json(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::to_string(value).ok().map(Self)
    }
}

/// An array whose elements are all strings.
///
/// An array holding any non-string element is rejected as a whole rather than
/// filtered, so a partially malformed list is never mistaken for a complete one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringArray(pub Vec<String>);

impl FieldValue for StringArray {
    const KIND: &'static str = "an array of strings";

    fn from_json(value: &Value) -> Option<Self> {
        value
            .as_array()?
            .iter()
            .map(|v| v.as_str().map(str::to_owned))
            .collect::<Option<Vec<_>>>()
            .map(Self)
    }
}

/// Member names of an object, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectKeys(pub Vec<String>);

impl FieldValue for ObjectKeys {
    const KIND: &'static str = "an object";

    fn from_json(value: &Value) -> Option<Self> {
        value
            .as_object()
            .map(|map| Self(map.keys().cloned().collect()))
    }
}

/// Read-only, pointer-addressed access to a parsed JSON document.
pub trait FieldAccess {
    /// The parsed document, or `None` when there is nothing to read.
    fn document(&self) -> Option<&Value>;

    /// Resolve a pointer to a node.
    ///
    /// Malformed pointers never resolve.
    fn lookup(&self, path: &str) -> Option<&Value> {
        let pointer = JsonPointer::parse(path).ok()?;
        self.document()?.pointer(pointer.as_str())
    }

    /// Fetch a typed value at `path`.
    fn fetch<T: FieldValue>(&self, path: &str) -> Option<T> {
        self.lookup(path).and_then(T::from_json)
    }

    /// Fetch a typed value, describing the failure when it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::FieldAbsentOrMismatched`] when the path does not
    /// resolve to a value of type `T`.
    fn require<T: FieldValue>(&self, path: &str) -> BackendResult<T> {
        self.fetch(path)
            .ok_or_else(|| BackendError::FieldAbsentOrMismatched {
                path: path.to_string(),
                expected: T::KIND,
            })
    }
}

impl FieldAccess for Value {
    fn document(&self) -> Option<&Value> {
        Some(self)
    }
}
