//! The backend response envelope.

use std::fmt;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{BackendError, BackendResult};
use crate::field::{FieldAccess, ObjectKeys, ObjectText, StringArray};
use crate::plugin::{PluginLayout, PluginUpdatePackage};
use crate::pointer::JsonPointer;
use crate::report::{ErrorCode, ErrorReport, ErrorSink};
use crate::whitelist::HookWhitelistMap;

/// Pointer to the API-level status code.
pub const STATUS_PATH: &str = "/status";

/// Pointer to the API-level status description.
pub const DESCRIPTION_PATH: &str = "/description";

/// One response from the management backend.
///
/// The body is parsed exactly once, at construction. A body that fails to
/// parse still yields a usable envelope: [`has_error`](Self::has_error)
/// reports it, every accessor returns `None`, and [`check`](Self::check)
/// rejects it. The raw status, headers and body are never modified; the
/// parsed tree only changes through [`erase_value`](Self::erase_value).
#[derive(Clone)]
pub struct BackendResponse {
    status_code: i64,
    headers: String,
    body: String,
    document: Option<Value>,
    error_msg: Option<String>,
}

impl BackendResponse {
    /// Wrap a fetched response.
    #[must_use]
    pub fn new(status_code: i64, headers: impl Into<String>, body: impl Into<String>) -> Self {
        let headers = headers.into();
        let body = body.into();
        let (document, error_msg) = match serde_json::from_str::<Value>(&body) {
            Ok(document) => (Some(document), None),
            Err(e) => {
                debug!(status_code, error = %e, "backend response body is not valid JSON");
                (None, Some(e.to_string()))
            },
        };
        Self {
            status_code,
            headers,
            body,
            document,
            error_msg,
        }
    }

    /// Whether the body failed to parse.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.error_msg.is_some()
    }

    /// Parser diagnostic, if the body failed to parse.
    #[must_use]
    pub fn error_msg(&self) -> Option<&str> {
        self.error_msg.as_deref()
    }

    /// Transport-level status code.
    #[must_use]
    pub fn http_code(&self) -> i64 {
        self.status_code
    }

    /// Whether the status code is in `200..300`.
    #[must_use]
    pub fn http_code_ok(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Raw header text as received.
    #[must_use]
    pub fn headers(&self) -> &str {
        &self.headers
    }

    /// Raw body text as received.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// API-level status code at `/status`.
    #[must_use]
    pub fn fetch_status(&self) -> Option<i64> {
        self.fetch_int64(STATUS_PATH)
    }

    /// API-level description at `/description`.
    #[must_use]
    pub fn fetch_description(&self) -> Option<String> {
        self.fetch_string(DESCRIPTION_PATH)
    }

    /// Integer at `path`.
    #[must_use]
    pub fn fetch_int64(&self, path: &str) -> Option<i64> {
        self.fetch(path)
    }

    /// String at `path`.
    #[must_use]
    pub fn fetch_string(&self, path: &str) -> Option<String> {
        self.fetch(path)
    }

    /// Object at `path`, rendered as compact JSON text.
    ///
    /// Returns `None` when `path` does not resolve to an object.
    #[must_use]
    pub fn stringify_object(&self, path: &str) -> Option<String> {
        self.fetch::<ObjectText>(path).map(|text| text.0)
    }

    /// String array at `path`.
    ///
    /// Returns `None` when `path` does not resolve to an array or any element
    /// is not a string.
    #[must_use]
    pub fn fetch_string_array(&self, path: &str) -> Option<Vec<String>> {
        self.fetch::<StringArray>(path).map(|array| array.0)
    }

    /// Member names of the object at `path`; empty when it is not an object.
    #[must_use]
    pub fn fetch_object_keys(&self, path: &str) -> Vec<String> {
        self.fetch::<ObjectKeys>(path)
            .map(|keys| keys.0)
            .unwrap_or_default()
    }

    /// Remove the value at `path` from the parsed tree.
    ///
    /// Returns `true` if a node existed there and was removed. The root cannot
    /// be erased. The raw body is left intact.
    pub fn erase_value(&mut self, path: &str) -> bool {
        let Ok(pointer) = JsonPointer::parse(path) else {
            return false;
        };
        let Some((parent, last)) = pointer.parent_and_last() else {
            return false;
        };
        let Some(document) = self.document.as_mut() else {
            return false;
        };
        match document.pointer_mut(parent.as_str()) {
            Some(Value::Object(map)) => map.remove(&last).is_some(),
            Some(Value::Array(items)) => match parse_index(&last) {
                Some(index) if index < items.len() => {
                    items.remove(index);
                    true
                },
                _ => false,
            },
            _ => false,
        }
    }

    /// Classify the response.
    ///
    /// Checks, in order: the body parsed, the HTTP status is 2xx, and the
    /// API-level `status` is zero. A `status` that is absent or not an integer
    /// is not an API failure; field-level problems are left to the callers of
    /// the individual accessors.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::ParseFailure`], [`BackendError::TransportFailure`],
    /// or [`BackendError::ApiFailure`].
    pub fn check(&self) -> BackendResult<()> {
        if let Some(message) = &self.error_msg {
            return Err(BackendError::ParseFailure {
                message: message.clone(),
            });
        }
        if !self.http_code_ok() {
            return Err(BackendError::TransportFailure {
                status_code: self.status_code,
            });
        }
        match self.fetch_status() {
            None | Some(0) => {
                if self.lookup(STATUS_PATH).is_some_and(|v| !v.is_null() && !v.is_i64()) {
                    warn!(path = STATUS_PATH, "ignoring non-integer API status");
                }
                Ok(())
            },
            Some(status) => Err(BackendError::ApiFailure {
                status,
                description: self.fetch_description().unwrap_or_default(),
            }),
        }
    }

    /// Acceptance gate.
    ///
    /// Returns `true` if [`check`](Self::check) passes. Otherwise reports one
    /// [`ErrorReport`] tagged with `code` to `sink` and returns `false`.
    pub fn verify(&self, code: ErrorCode, sink: &dyn ErrorSink) -> bool {
        match self.check() {
            Ok(()) => true,
            Err(e) => {
                sink.report(&ErrorReport::new(code, &e));
                false
            },
        }
    }

    /// Build a plugin package using the default field layout.
    #[must_use]
    pub fn build_plugin_update_package(&self) -> Option<PluginUpdatePackage> {
        self.build_plugin_update_package_with(&PluginLayout::default())
    }

    /// Build a plugin package using a custom field layout.
    ///
    /// Any rejection collapses to `None`; use
    /// [`try_build_plugin_update_package`](Self::try_build_plugin_update_package)
    /// to learn why.
    #[must_use]
    pub fn build_plugin_update_package_with(
        &self,
        layout: &PluginLayout,
    ) -> Option<PluginUpdatePackage> {
        self.try_build_plugin_update_package(layout).ok().flatten()
    }

    /// Build a plugin package, keeping the rejection reason.
    ///
    /// `Ok(None)` means no plugin was offered.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::IntegrityMismatch`] when the digest does not
    /// match, or [`BackendError::FieldAbsentOrMismatched`] when the version is
    /// missing.
    pub fn try_build_plugin_update_package(
        &self,
        layout: &PluginLayout,
    ) -> BackendResult<Option<PluginUpdatePackage>> {
        PluginUpdatePackage::extract(self, layout)
    }

    /// Build the hook whitelist map from the object at `path`.
    #[must_use]
    pub fn build_hook_white_map(&self, path: &str) -> HookWhitelistMap {
        HookWhitelistMap::extract(self, path)
    }
}

impl FieldAccess for BackendResponse {
    fn document(&self) -> Option<&Value> {
        self.document.as_ref()
    }
}

// Bodies may carry plugin source and credentials; print sizes only.
impl fmt::Debug for BackendResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendResponse")
            .field("status_code", &self.status_code)
            .field("headers_len", &self.headers.len())
            .field("body_len", &self.body.len())
            .field("parse_error", &self.error_msg)
            .finish_non_exhaustive()
    }
}

/// Parse an RFC 6901 array index: `0` or digits without a leading zero.
fn parse_index(token: &str) -> Option<usize> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if token.len() > 1 && token.starts_with('0') {
        return None;
    }
    token.parse().ok()
}
