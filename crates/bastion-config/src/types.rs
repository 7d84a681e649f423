//! Configuration types for the backend protocol layer.
//!
//! Every struct implements [`Default`] with the values the management
//! backend uses in production, so a bare `[section]` header in TOML produces
//! a working configuration.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend response layout and plugin verification.
    pub backend: BackendSection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// BackendSection
// ---------------------------------------------------------------------------

/// Where the backend places the fields the agent consumes.
///
/// All paths are RFC 6901 JSON pointers into the response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSection {
    /// Pointer to the plugin source string.
    pub plugin_source_path: String,
    /// Pointer to the declared plugin digest.
    pub plugin_digest_path: String,
    /// Pointer to the plugin version string.
    pub plugin_version_path: String,
    /// Digest algorithm: `"md5"`, `"sha256"`, or `"blake3"`.
    pub digest_algorithm: String,
    /// Pointer to the hook whitelist object.
    pub hook_whitelist_path: String,
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            plugin_source_path: "/data/plugin/plugin".to_owned(),
            plugin_digest_path: "/data/plugin/md5".to_owned(),
            plugin_version_path: "/data/plugin/version".to_owned(),
            digest_algorithm: "md5".to_owned(),
            hook_whitelist_path: "/data/config/hook.white".to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"`, or `"full"`.
    pub format: String,
    /// Output stream: `"stderr"` or `"stdout"`.
    pub target: String,
    /// Prefix events with a timestamp.
    pub timestamps: bool,
    /// Colorize output.
    pub ansi: bool,
    /// Per-crate tracing directives (e.g. `["bastion_backend=debug"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            target: "stderr".to_owned(),
            timestamps: true,
            ansi: true,
            directives: Vec::new(),
        }
    }
}
