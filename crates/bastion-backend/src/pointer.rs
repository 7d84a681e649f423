//! RFC 6901 JSON pointers.
//!
//! Backend field paths such as `/data/plugin/md5` are JSON pointers. Member
//! names taken from the response itself (hook names, for instance) must be
//! escaped before they are appended to a pointer, otherwise a name like
//! `sql/select` would address a nested member instead of itself.

use std::borrow::Cow;
use std::fmt;

use crate::error::{BackendError, BackendResult};

/// Escape a single reference token.
///
/// `~` becomes `~0` and `/` becomes `~1`. The `~` replacement runs first so
/// that the `~` introduced by `~1` is never escaped again.
#[must_use]
pub fn escape_token(token: &str) -> Cow<'_, str> {
    if !token.contains(['~', '/']) {
        return Cow::Borrowed(token);
    }
    Cow::Owned(token.replace('~', "~0").replace('/', "~1"))
}

/// Reverse of [`escape_token`].
#[must_use]
pub fn unescape_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

/// A syntactically valid JSON pointer.
///
/// The empty pointer addresses the whole document; every other pointer starts
/// with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPointer(String);

impl JsonPointer {
    /// Pointer to the document root.
    #[must_use]
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Parse a pointer.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidPointer`] if the text is non-empty and
    /// does not start with `/`, or contains a `~` not followed by `0` or `1`.
    pub fn parse(text: &str) -> BackendResult<Self> {
        if !text.is_empty() && !text.starts_with('/') {
            return Err(BackendError::InvalidPointer(text.to_string()));
        }
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c == '~' && !matches!(chars.next(), Some('0' | '1')) {
                return Err(BackendError::InvalidPointer(text.to_string()));
            }
        }
        Ok(Self(text.to_string()))
    }

    /// Append a raw member name, escaping it.
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        let escaped = escape_token(name);
        let mut path = String::with_capacity(
            self.0
                .len()
                .saturating_add(escaped.len())
                .saturating_add(1),
        );
        path.push_str(&self.0);
        path.push('/');
        path.push_str(&escaped);
        Self(path)
    }

    /// Split into the parent pointer and the unescaped last token.
    ///
    /// Returns `None` for the root pointer.
    #[must_use]
    pub fn parent_and_last(&self) -> Option<(Self, String)> {
        let idx = self.0.rfind('/')?;
        let parent = Self(self.0[..idx].to_string());
        let last = unescape_token(&self.0[idx.saturating_add(1)..]);
        Some((parent, last))
    }

    /// Unescaped reference tokens, in order.
    #[must_use]
    pub fn tokens(&self) -> Vec<String> {
        if self.0.is_empty() {
            return Vec::new();
        }
        self.0
            .split('/')
            .skip(1)
            .map(unescape_token)
            .collect()
    }

    /// Whether this is the root pointer.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The pointer text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for JsonPointer {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
