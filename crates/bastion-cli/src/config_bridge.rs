//! Bridge from `bastion_config::Config` to domain types.

use anyhow::{Context, Result};
use bastion_backend::PluginLayout;
use bastion_config::Config;
use bastion_crypto::DigestAlgorithm;
use bastion_telemetry::{LogConfig, LogFormat, LogTarget};

/// Convert config to [`LogConfig`].
pub(crate) fn to_log_config(cfg: &Config) -> LogConfig {
    let mut log_config = LogConfig::new(&cfg.logging.level)
        .with_format(LogFormat::from_name(&cfg.logging.format))
        .with_target(LogTarget::from_name(&cfg.logging.target))
        .with_timestamps(cfg.logging.timestamps)
        .with_ansi(cfg.logging.ansi);

    for directive in &cfg.logging.directives {
        log_config = log_config.with_directive(directive);
    }

    log_config
}

/// Convert config to the [`PluginLayout`] used to extract plugin packages.
pub(crate) fn to_plugin_layout(cfg: &Config) -> Result<PluginLayout> {
    let algorithm: DigestAlgorithm = cfg
        .backend
        .digest_algorithm
        .parse()
        .context("backend.digest_algorithm")?;

    Ok(PluginLayout {
        source_path: cfg.backend.plugin_source_path.clone(),
        digest_path: cfg.backend.plugin_digest_path.clone(),
        version_path: cfg.backend.plugin_version_path.clone(),
        algorithm,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_maps_to_default_layout() {
        let layout = to_plugin_layout(&Config::default()).unwrap();
        assert_eq!(layout, PluginLayout::default());
    }

    #[test]
    fn custom_backend_section() {
        let cfg = Config::from_toml_str(
            r#"
            [backend]
            plugin_digest_path = "/data/plugin/sha256"
            digest_algorithm = "sha256"
            "#,
        )
        .unwrap();
        let layout = to_plugin_layout(&cfg).unwrap();
        assert_eq!(layout.digest_path, "/data/plugin/sha256");
        assert_eq!(layout.algorithm, DigestAlgorithm::Sha256);
    }

    #[test]
    fn unknown_algorithm_is_an_error() {
        let mut cfg = Config::default();
        cfg.backend.digest_algorithm = "crc32".to_string();
        assert!(to_plugin_layout(&cfg).is_err());
    }

    #[test]
    fn logging_section_maps_to_log_config() {
        let mut cfg = Config::default();
        cfg.logging.level = "warn".to_string();
        cfg.logging.format = "json".to_string();
        cfg.logging.directives = vec!["bastion_backend=trace".to_string()];

        let log_config = to_log_config(&cfg);
        assert_eq!(log_config.level, "warn");
        assert_eq!(log_config.format, LogFormat::Json);
        assert_eq!(log_config.directives, vec!["bastion_backend=trace"]);
        assert_eq!(log_config.target, LogTarget::Stderr);
        assert!(log_config.timestamps);
    }

    #[test]
    fn logging_output_options_come_from_toml() {
        let cfg = Config::from_toml_str(
            r#"
            [logging]
            target = "stdout"
            timestamps = false
            ansi = false
            "#,
        )
        .unwrap();

        let log_config = to_log_config(&cfg);
        assert_eq!(log_config.target, LogTarget::Stdout);
        assert!(!log_config.timestamps);
        assert!(!log_config.ansi);
        assert_eq!(log_config.format, LogFormat::Compact);
    }
}
