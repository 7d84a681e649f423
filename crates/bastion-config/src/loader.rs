//! Config file loading.

use std::path::Path;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: usize = 1_048_576;

/// Parse the embedded defaults.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the defaults do not parse or validate.
pub fn load_defaults() -> ConfigResult<Config> {
    load_str(DEFAULTS_TOML, "<embedded defaults>")
}

/// Parse and validate TOML text. `origin` names the source in errors.
///
/// # Errors
///
/// Returns a [`ConfigError`] on parse or validation failure.
pub fn load_str(text: &str, origin: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: origin.to_owned(),
        source: e,
    })?;
    validate::validate(&config)?;
    Ok(config)
}

/// Load a config from a specific file path.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, is larger than the
/// size limit, or fails to parse or validate.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    // Check size after reading to avoid TOCTOU between stat and read.
    if content.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit",
                content.len()
            ),
        });
    }

    let config = load_str(&content, &path.display().to_string())?;
    debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn embedded_defaults_match_default_impl() {
        let embedded = load_defaults().unwrap();
        assert_eq!(embedded, Config::default());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"").unwrap();

        let config = load_file(file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "compact");
        assert_eq!(config.backend.plugin_digest_path, "/data/plugin/md5");
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let err = load_str("[backend\n", "<test>").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { ref path, .. } if path == "<test>"));
    }

    #[test]
    fn oversized_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let padding = "#".repeat(MAX_CONFIG_FILE_SIZE);
        writeln!(file, "{padding}").unwrap();
        let err = load_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("byte limit"));
    }
}
