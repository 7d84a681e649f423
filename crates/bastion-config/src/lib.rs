#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Configuration for the bastion backend protocol layer.
//!
//! A single [`Config`] type describes where the backend places plugin and
//! whitelist fields, which digest algorithm signs plugin source, and how the
//! tooling logs.
//!
//! # Usage
//!
//! ```rust
//! use bastion_config::Config;
//!
//! let config = Config::from_toml_str(r#"
//!     [backend]
//!     digest_algorithm = "sha256"
//!     plugin_digest_path = "/data/plugin/sha256"
//! "#).unwrap();
//! assert_eq!(config.backend.digest_algorithm, "sha256");
//! assert_eq!(config.backend.plugin_source_path, "/data/plugin/plugin");
//! ```
//!
//! # Design
//!
//! This crate has **no dependencies on other internal bastion crates**.
//! Conversion to domain types happens at the integration boundary.

/// Configuration error types.
pub mod error;
/// Configuration file loading.
pub mod loader;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use types::*;

impl Config {
    /// Parse the embedded defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the embedded defaults do not parse, which
    /// indicates a build defect.
    pub fn default_embedded() -> ConfigResult<Self> {
        loader::load_defaults()
    }

    /// Parse and validate configuration from TOML text.
    ///
    /// Sections and fields that are absent keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the text is not valid TOML or fails
    /// validation.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        loader::load_str(text, "<inline>")
    }

    /// Load configuration from a single file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load_file(path: &std::path::Path) -> ConfigResult<Self> {
        loader::load_file(path)
    }
}
