//! Per-hook bypass whitelists.
//!
//! The backend sends whitelists as an object of arrays:
//!
//! ```json
//! {"sql/select": ["sqli"], "command": []}
//! ```
//!
//! Each member name is a hook, each array lists the bypass types allowed to
//! skip detection for it.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::field::{FieldAccess, ObjectKeys, StringArray};
use crate::pointer::JsonPointer;

/// Mapping from hook name to whitelisted bypass types.
///
/// Every hook named in the response is present, even with an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HookWhitelistMap(BTreeMap<String, Vec<String>>);

impl HookWhitelistMap {
    /// Build the map from the object at `path`.
    ///
    /// Returns an empty map when `path` is not a valid pointer or does not
    /// resolve to an object. A member whose value is not an array of strings
    /// is kept with an empty list, so a malformed entry never grants a bypass.
    pub(crate) fn extract(access: &impl FieldAccess, path: &str) -> Self {
        let Ok(parent) = JsonPointer::parse(path) else {
            return Self::default();
        };
        let Some(ObjectKeys(hooks)) = access.fetch::<ObjectKeys>(parent.as_str()) else {
            return Self::default();
        };

        let mut map = BTreeMap::new();
        for hook in hooks {
            let child = parent.child(&hook);
            let bypasses = match access.fetch::<StringArray>(child.as_str()) {
                Some(StringArray(values)) => values,
                None => {
                    warn!(hook = %hook, path = %child, "hook whitelist entry is not an array of strings");
                    Vec::new()
                },
            };
            map.insert(hook, bypasses);
        }
        Self(map)
    }

    /// Whitelisted bypass types for `hook`.
    #[must_use]
    pub fn get(&self, hook: &str) -> Option<&[String]> {
        self.0.get(hook).map(Vec::as_slice)
    }

    /// Whether `hook` was mentioned at all.
    #[must_use]
    pub fn contains_hook(&self, hook: &str) -> bool {
        self.0.contains_key(hook)
    }

    /// Whether `bypass` is whitelisted for `hook`.
    #[must_use]
    pub fn is_bypass_allowed(&self, hook: &str, bypass: &str) -> bool {
        self.get(hook)
            .is_some_and(|allowed| allowed.iter().any(|b| b == bypass))
    }

    /// Number of hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no hook was mentioned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(hook, bypasses)` in hook-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Unwrap into the underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}
