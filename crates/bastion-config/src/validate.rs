//! Post-parse configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Supported digest algorithm names.
const DIGEST_ALGORITHMS: &[&str] = &["md5", "sha256", "blake3"];

/// Supported log formats.
const LOG_FORMATS: &[&str] = &["pretty", "compact", "json", "full"];

/// Supported log targets.
const LOG_TARGETS: &[&str] = &["stderr", "stdout"];

/// Validate a deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_backend(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_backend(config: &Config) -> ConfigResult<()> {
    let b = &config.backend;

    for (field, value) in [
        ("backend.plugin_source_path", &b.plugin_source_path),
        ("backend.plugin_digest_path", &b.plugin_digest_path),
        ("backend.plugin_version_path", &b.plugin_version_path),
        ("backend.hook_whitelist_path", &b.hook_whitelist_path),
    ] {
        validate_pointer(field, value)?;
    }

    if !DIGEST_ALGORITHMS.contains(&b.digest_algorithm.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "backend.digest_algorithm".to_owned(),
            message: format!(
                "unsupported algorithm '{}'; expected one of: {}",
                b.digest_algorithm,
                DIGEST_ALGORITHMS.join(", ")
            ),
        });
    }

    Ok(())
}

/// A JSON pointer is empty or starts with `/`, and every `~` is followed by
/// `0` or `1`.
fn validate_pointer(field: &str, value: &str) -> ConfigResult<()> {
    let invalid = |message: &str| ConfigError::ValidationError {
        field: field.to_owned(),
        message: format!("'{value}' {message}"),
    };

    if !value.is_empty() && !value.starts_with('/') {
        return Err(invalid("is not a JSON pointer; it must start with '/'"));
    }
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '~' && !matches!(chars.next(), Some('0' | '1')) {
            return Err(invalid("contains '~' not followed by '0' or '1'"));
        }
    }
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let l = &config.logging;

    if !LOG_FORMATS.contains(&l.format.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.format".to_owned(),
            message: format!(
                "unsupported format '{}'; expected one of: {}",
                l.format,
                LOG_FORMATS.join(", ")
            ),
        });
    }

    if !LOG_TARGETS.contains(&l.target.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.target".to_owned(),
            message: format!(
                "unsupported target '{}'; expected one of: {}",
                l.target,
                LOG_TARGETS.join(", ")
            ),
        });
    }

    if l.level.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "logging.level".to_owned(),
            message: "level must not be empty".to_owned(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: ConfigError) -> String {
        match err {
            ConfigError::ValidationError { field, .. } => field,
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn default_config_is_valid() {
        validate(&Config::default()).unwrap();
    }

    #[test]
    fn rejects_relative_pointer() {
        let mut config = Config::default();
        config.backend.plugin_source_path = "data/plugin/plugin".to_owned();
        assert_eq!(field_of(validate(&config).unwrap_err()), "backend.plugin_source_path");
    }

    #[test]
    fn rejects_bad_escape() {
        let mut config = Config::default();
        config.backend.hook_whitelist_path = "/data/hook~2white".to_owned();
        assert_eq!(field_of(validate(&config).unwrap_err()), "backend.hook_whitelist_path");
    }

    #[test]
    fn accepts_escaped_and_root_pointers() {
        let mut config = Config::default();
        config.backend.hook_whitelist_path = "/data/a~1b~0c".to_owned();
        config.backend.plugin_version_path = String::new();
        validate(&config).unwrap();
    }

    #[test]
    fn rejects_unknown_algorithm() {
        let mut config = Config::default();
        config.backend.digest_algorithm = "sha1".to_owned();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("sha1"));
    }

    #[test]
    fn rejects_unknown_log_format_and_empty_level() {
        let mut config = Config::default();
        config.logging.format = "xml".to_owned();
        assert_eq!(field_of(validate(&config).unwrap_err()), "logging.format");

        let mut config = Config::default();
        config.logging.level = "  ".to_owned();
        assert_eq!(field_of(validate(&config).unwrap_err()), "logging.level");
    }

    #[test]
    fn rejects_file_log_target() {
        let mut config = Config::default();
        config.logging.target = "file".to_owned();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("stderr, stdout"));
        assert_eq!(field_of(err), "logging.target");
    }
}
