//! Logging setup for the `dynbind` binary and embedders
//!
//! The library itself only emits `tracing` events under the targets
//! `registry`, `interop`, `dispatch` and `runtime`; installing a subscriber
//! is left to whoever owns the process.

use crate::frontend::config::{LogFormatName, LogOutputName, LoggingConfig};
use tracing::Level;
use tracing_appender::{non_blocking::{NonBlocking, WorkerGuard}, rolling};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
    /// Daily rotated files `<directory>/<prefix>.<date>`
    File { directory: String, prefix: String },
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Emit span open/close events (e.g. around `Interpreter::execute`)
    pub span_events: bool,
    /// Extra filter directives, e.g. `interop=trace,dispatch=debug`
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::Pretty,
            output: LogOutput::Stderr,
            span_events: false,
            filter: None,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

impl From<&LoggingConfig> for LogConfig {
    fn from(section: &LoggingConfig) -> Self {
        let format = match section.format {
            LogFormatName::Pretty => LogFormat::Pretty,
            LogFormatName::Compact => LogFormat::Compact,
            LogFormatName::Json => LogFormat::Json,
        };
        let output = match section.output {
            LogOutputName::Stdout => LogOutput::Stdout,
            LogOutputName::Stderr => LogOutput::Stderr,
            LogOutputName::File => LogOutput::File {
                directory: section.directory.clone(),
                prefix: "dynbind".to_string(),
            },
        };
        Self {
            level: section.level.parse().unwrap_or(Level::WARN),
            format,
            output,
            filter: section.filter.clone(),
            ..Self::default()
        }
    }
}

/// Install the global subscriber described by `config`.
///
/// The returned guard flushes the non-blocking writer when dropped; keep it
/// alive until the program exits. Returns `None` if a subscriber was already
/// installed.
pub fn init_logging(config: LogConfig) -> Option<WorkerGuard> {
    let (writer, guard) = match &config.output {
        LogOutput::Stdout => tracing_appender::non_blocking(std::io::stdout()),
        LogOutput::Stderr => tracing_appender::non_blocking(std::io::stderr()),
        LogOutput::File { directory, prefix } => {
            tracing_appender::non_blocking(rolling::daily(directory, prefix))
        }
    };

    let installed = install(&config, writer);
    if installed {
        Some(guard)
    } else {
        None
    }
}

fn install(config: &LogConfig, writer: NonBlocking) -> bool {
    let filter = build_filter(config);
    let spans = span_events_config(config.span_events);

    let layer = match config.format {
        LogFormat::Pretty => fmt::layer()
            .with_writer(writer)
            .pretty()
            .with_span_events(spans)
            .with_filter(filter)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .with_writer(writer)
            .compact()
            .with_span_events(spans)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .with_writer(writer)
            .json()
            .with_span_events(spans)
            .with_filter(filter)
            .boxed(),
    };

    tracing_subscriber::registry().with(layer).try_init().is_ok()
}

fn build_filter(config: &LogConfig) -> EnvFilter {
    let base_filter = EnvFilter::from_default_env()
        .add_directive(config.level.into());

    match &config.filter {
        Some(filter_str) => {
            filter_str.split(',')
                .filter(|directive| !directive.trim().is_empty())
                .fold(base_filter, |filter, directive| {
                    filter.add_directive(directive.trim().parse().unwrap_or_else(|_| {
                        tracing::warn!("Invalid filter directive: {}", directive);
                        config.level.into()
                    }))
                })
        }
        None => base_filter,
    }
}

fn span_events_config(enabled: bool) -> FmtSpan {
    if enabled {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = LogConfig::new()
            .with_level(Level::DEBUG)
            .with_format(LogFormat::Json)
            .with_span_events(true)
            .with_filter("dispatch=trace");

        assert_eq!(config.level, Level::DEBUG);
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.span_events);
        assert_eq!(config.filter, Some("dispatch=trace".to_string()));
    }

    #[test]
    fn test_from_config_section() {
        let section = LoggingConfig {
            level: "trace".to_string(),
            format: LogFormatName::Compact,
            filter: Some("runtime=debug".to_string()),
            ..LoggingConfig::default()
        };
        let config = LogConfig::from(&section);
        assert_eq!(config.level, Level::TRACE);
        assert_eq!(config.format, LogFormat::Compact);
        assert_eq!(config.output, LogOutput::Stderr);

        let file = LoggingConfig {
            output: LogOutputName::File,
            directory: "/tmp/dynbind-logs".to_string(),
            ..LoggingConfig::default()
        };
        assert_eq!(
            LogConfig::from(&file).output,
            LogOutput::File {
                directory: "/tmp/dynbind-logs".to_string(),
                prefix: "dynbind".to_string(),
            }
        );

        let bad = LoggingConfig {
            level: "loud".to_string(),
            ..LoggingConfig::default()
        };
        assert_eq!(LogConfig::from(&bad).level, Level::WARN);
    }
}
