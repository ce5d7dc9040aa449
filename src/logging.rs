//! Structured logging bootstrap.
//!
//! The library itself only emits `tracing` events; installing a subscriber is
//! up to the application. This module is a ready-made one: JSON lines for
//! production, pretty output for development, filtered by `RUST_LOG` or the
//! configured level.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `ROUTEFLOW_LOG_LEVEL` | `info` | trace/debug/info/warn/error |
//! | `ROUTEFLOW_LOG_FORMAT` | `json` | `json` or `pretty` |
//! | `ROUTEFLOW_LOG_ASYNC` | `false` | write through a non-blocking worker |
//! | `ROUTEFLOW_LOG_TARGET_FILTER` | unset | extra directives, comma separated |
//! | `ROUTEFLOW_LOG_INCLUDE_LOCATION` | `false` | add file and line |

use anyhow::{Context, Result};
use std::env;
use std::sync::OnceLock;
use tracing::{Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for production, pretty-print for development
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    /// Log format: json/pretty
    pub format: LogFormat,
    /// Write logs from a background worker thread
    pub async_logging: bool,
    /// Extra filter directives (comma-separated), e.g. `routeflow::pattern=trace`
    pub target_filter: Option<String>,
    /// Include file:line location (dev only)
    pub include_location: bool,
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("ROUTEFLOW_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: LogFormat::parse(
                &env::var("ROUTEFLOW_LOG_FORMAT").unwrap_or_else(|_| "json".to_string()),
            ),
            async_logging: env_flag("ROUTEFLOW_LOG_ASYNC", false),
            target_filter: env::var("ROUTEFLOW_LOG_TARGET_FILTER").ok(),
            include_location: env_flag("ROUTEFLOW_LOG_INCLUDE_LOCATION", false),
        }
    }

    /// Verbose, human-readable configuration for development and tests
    pub fn default_dev() -> Self {
        Self {
            log_level: "debug".to_string(),
            format: LogFormat::Pretty,
            async_logging: false,
            target_filter: None,
            include_location: true,
        }
    }

    /// JSON lines at `info`, written asynchronously
    pub fn default_prod() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Json,
            async_logging: true,
            target_filter: None,
            include_location: false,
        }
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let mut env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));

        if let Some(target_filter) = &self.target_filter {
            for filter in target_filter.split(',') {
                let filter = filter.trim();
                if filter.is_empty() {
                    continue;
                }
                match filter.parse() {
                    Ok(directive) => env_filter = env_filter.add_directive(directive),
                    Err(_) => eprintln!("Warning: Invalid log filter directive: {filter}"),
                }
            }
        }
        env_filter
    }
}

/// Install a global subscriber for `config`.
///
/// Fails, without panicking, if a global subscriber is already installed.
///
/// ```no_run
/// use routeflow::logging::{init_logging_with_config, LogConfig};
///
/// init_logging_with_config(&LogConfig::from_env())?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logging_with_config(config: &LogConfig) -> Result<()> {
    let (writer, guard) = if config.async_logging {
        let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stdout());
        (BoxMakeWriter::new(non_blocking), Some(guard))
    } else {
        (BoxMakeWriter::new(std::io::stdout), None)
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer(config, writer))
        .try_init()
        .context("Failed to initialize logging")?;

    if let Some(guard) = guard {
        // Only reachable once: a second init fails above.
        let _ = WORKER_GUARD.set(guard);
    }
    Ok(())
}

/// Background writer of the async mode, alive for the rest of the process.
static WORKER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// The formatting layer for `config`, writing to `writer`.
fn fmt_layer<S>(config: &LogConfig, writer: BoxMakeWriter) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span> + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_writer(writer);

    match config.format {
        LogFormat::Json => layer
            .json()
            .with_current_span(true)
            .with_thread_ids(true)
            .boxed(),
        LogFormat::Pretty => layer.pretty().boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_default_dev() {
        let config = LogConfig::default_dev();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(!config.async_logging);
        assert!(config.include_location);
        assert_eq!(config.level(), Level::DEBUG);
    }

    #[test]
    fn test_log_config_default_prod() {
        let config = LogConfig::default_prod();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.async_logging);
        assert!(!config.include_location);
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("PRETTY"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("invalid"), LogFormat::Json);
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        let config = LogConfig {
            log_level: "chatty".to_string(),
            ..LogConfig::default_prod()
        };
        assert_eq!(config.level(), Level::INFO);
    }

    #[test]
    fn test_fmt_layer_writes_both_formats() {
        use std::io::Write;
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl Write for Captured {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        for format in [LogFormat::Json, LogFormat::Pretty] {
            let out = Captured::default();
            let sink = out.clone();
            let config = LogConfig {
                format,
                ..LogConfig::default_dev()
            };
            let subscriber = tracing_subscriber::registry().with(fmt_layer(
                &config,
                BoxMakeWriter::new(move || sink.clone()),
            ));
            tracing::subscriber::with_default(subscriber, || {
                tracing::info!(route = "/articles", "matched");
            });

            let text = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
            assert!(text.contains("matched"), "{format:?}: {text}");
            assert!(text.contains("/articles"), "{format:?}: {text}");
            if format == LogFormat::Json {
                assert!(text.trim_start().starts_with('{'), "{text}");
            }
        }
    }

    #[test]
    fn test_second_init_is_an_error() {
        let config = LogConfig {
            target_filter: Some("routeflow=trace, not a directive ,".to_string()),
            ..LogConfig::default_dev()
        };
        // Another test binary thread may have installed one already; either
        // way the second call must fail instead of panicking.
        let _first = init_logging_with_config(&config);
        assert!(init_logging_with_config(&config).is_err());
    }
}
