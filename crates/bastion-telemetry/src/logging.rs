//! Subscriber installation for the bastion binaries.

use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::ParseError,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

use crate::error::{TelemetryError, TelemetryResult};

/// Event rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, indented.
    Pretty,
    /// One line per event.
    #[default]
    Compact,
    /// Newline-delimited JSON.
    Json,
    /// The `tracing-subscriber` default format.
    Full,
}

impl LogFormat {
    /// Parse a format name, falling back to [`LogFormat::Compact`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "pretty" => Self::Pretty,
            "json" => Self::Json,
            "full" => Self::Full,
            _ => Self::Compact,
        }
    }
}

/// Stream the events are written to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard output.
    Stdout,
    /// Standard error. Keeps stdout free for command output.
    #[default]
    Stderr,
}

impl LogTarget {
    /// Parse a target name, falling back to [`LogTarget::Stderr`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "stdout" => Self::Stdout,
            _ => Self::Stderr,
        }
    }
}

/// Subscriber settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Base filter (e.g. `"info"`).
    pub level: String,
    /// Event rendering.
    pub format: LogFormat,
    /// Output stream.
    pub target: LogTarget,
    /// Prefix events with a timestamp.
    pub timestamps: bool,
    /// Colorize output.
    pub ansi: bool,
    /// Extra per-target directives (e.g. `bastion_backend=debug`).
    pub directives: Vec<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new("info")
    }
}

impl LogConfig {
    /// Settings with the given base level and defaults elsewhere.
    #[must_use]
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            format: LogFormat::default(),
            target: LogTarget::default(),
            timestamps: true,
            ansi: true,
            directives: Vec::new(),
        }
    }

    /// Set the format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the output stream.
    #[must_use]
    pub fn with_target(mut self, target: LogTarget) -> Self {
        self.target = target;
        self
    }

    /// Turn timestamps on or off.
    #[must_use]
    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// Turn ANSI colors on or off.
    #[must_use]
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    /// Append a filter directive.
    #[must_use]
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    fn build_filter(&self) -> TelemetryResult<EnvFilter> {
        let config_error = |e: ParseError| TelemetryError::ConfigError(e.to_string());

        let mut filter = EnvFilter::try_new(&self.level).map_err(config_error)?;
        for directive in &self.directives {
            filter = filter.add_directive(directive.parse().map_err(config_error)?);
        }
        Ok(filter)
    }
}

/// Install the global subscriber described by `config`.
///
/// # Errors
///
/// Returns [`TelemetryError::ConfigError`] for an unparsable level or
/// directive, and [`TelemetryError::InitError`] if a global subscriber is
/// already set.
pub fn setup_logging(config: &LogConfig) -> TelemetryResult<()> {
    let filter = config.build_filter()?;
    let layer = match config.target {
        LogTarget::Stdout => fmt_layer(config, std::io::stdout),
        LogTarget::Stderr => fmt_layer(config, std::io::stderr),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| TelemetryError::InitError(e.to_string()))
}

fn fmt_layer<S, W>(config: &LogConfig, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let base = fmt::layer().with_writer(writer).with_ansi(config.ansi);

    // `without_time` changes the layer type, so each combination is boxed.
    match (config.format, config.timestamps) {
        (LogFormat::Json, true) => base.json().boxed(),
        (LogFormat::Json, false) => base.json().without_time().boxed(),
        (LogFormat::Pretty, true) => base.pretty().boxed(),
        (LogFormat::Pretty, false) => base.pretty().without_time().boxed(),
        (LogFormat::Compact, true) => base.compact().boxed(),
        (LogFormat::Compact, false) => base.compact().without_time().boxed(),
        (LogFormat::Full, true) => base.boxed(),
        (LogFormat::Full, false) => base.without_time().boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::Registry;

    #[test]
    fn defaults_write_compact_to_stderr() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Compact);
        assert_eq!(config.target, LogTarget::Stderr);
        assert!(config.timestamps);
        assert!(config.ansi);
        assert!(config.directives.is_empty());
    }

    #[test]
    fn builder_sets_every_field() {
        let config = LogConfig::new("debug")
            .with_format(LogFormat::Json)
            .with_target(LogTarget::Stdout)
            .with_timestamps(false)
            .with_ansi(false)
            .with_directive("bastion_backend=trace");

        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.target, LogTarget::Stdout);
        assert!(!config.timestamps);
        assert!(!config.ansi);
        assert_eq!(config.directives, vec!["bastion_backend=trace"]);
    }

    #[test]
    fn names_parse_with_fallbacks() {
        assert_eq!(LogFormat::from_name("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::from_name("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_name("full"), LogFormat::Full);
        assert_eq!(LogFormat::from_name("anything"), LogFormat::Compact);

        assert_eq!(LogTarget::from_name("stdout"), LogTarget::Stdout);
        assert_eq!(LogTarget::from_name("stderr"), LogTarget::Stderr);
        assert_eq!(LogTarget::from_name("syslog"), LogTarget::Stderr);
    }

    #[test]
    fn filter_accepts_directives() {
        let config = LogConfig::new("debug").with_directive("bastion_backend=trace");
        assert!(config.build_filter().is_ok());
    }

    #[test]
    fn filter_rejects_bad_directive() {
        let config = LogConfig::new("debug").with_directive("[invalid=syntax");
        assert!(matches!(
            config.build_filter(),
            Err(TelemetryError::ConfigError(_))
        ));
    }

    #[test]
    fn every_format_builds_a_layer() {
        for format in [
            LogFormat::Pretty,
            LogFormat::Compact,
            LogFormat::Json,
            LogFormat::Full,
        ] {
            for timestamps in [true, false] {
                let config = LogConfig::new("info")
                    .with_format(format)
                    .with_timestamps(timestamps);
                let layer = fmt_layer::<Registry, _>(&config, std::io::sink);
                let _subscriber = tracing_subscriber::registry().with(layer);
            }
        }
    }
}
