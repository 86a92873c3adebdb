//! Logging and tracing configuration
//!
//! This module provides centralized logging configuration for the generator.
//! Console output goes to stderr so that `--print-config` output on stdout
//! stays machine-readable.

use std::io;
use tracing::{info, Level};

use crate::types::CliArgs;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Default log file prefix
pub const DEFAULT_LOG_PREFIX: &str = "ecom-synth";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for the application
    pub level: Level,
    /// Whether to enable JSON formatting
    pub json_format: bool,
    /// Whether to log to file
    pub log_to_file: bool,
    /// Log file directory (if logging to file)
    pub log_directory: Option<String>,
    /// Log file prefix (if logging to file)
    pub log_file_prefix: String,
    /// Whether to enable span events
    pub enable_span_events: bool,
    /// Whether to enable ansi colors in console output
    pub enable_ansi: bool,
    /// Custom environment filter
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json_format: false,
            log_to_file: false,
            log_directory: None,
            log_file_prefix: DEFAULT_LOG_PREFIX.to_string(),
            enable_span_events: false,
            enable_ansi: true,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Create a new logging configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Enable JSON formatting
    pub fn with_json_format(mut self) -> Self {
        self.json_format = true;
        self
    }

    /// Enable file logging
    pub fn with_file_logging(mut self, directory: impl Into<String>) -> Self {
        self.log_to_file = true;
        self.log_directory = Some(directory.into());
        self
    }

    /// Set log file prefix
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.log_file_prefix = prefix.into();
        self
    }

    /// Enable span events
    pub fn with_span_events(mut self) -> Self {
        self.enable_span_events = true;
        self
    }

    /// Disable ANSI colors
    pub fn without_ansi(mut self) -> Self {
        self.enable_ansi = false;
        self
    }

    /// Set custom environment filter
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Logging configuration for the CLI verbosity flags
    pub fn for_verbosity(verbose: bool, debug: bool) -> Self {
        match (verbose, debug) {
            (_, true) => Self::new().with_level(Level::DEBUG).with_span_events(),
            (true, false) => Self::new().with_level(Level::INFO),
            (false, false) => Self::new().with_level(Level::WARN),
        }
    }

    /// Logging configuration for the command line: verbosity plus optional file output
    pub fn from_cli(args: &CliArgs) -> Self {
        let config = Self::for_verbosity(args.verbose, args.debug);
        match &args.log_dir {
            Some(directory) => config.with_file_logging(directory.clone()),
            None => config,
        }
    }

    fn span_events(&self) -> FmtSpan {
        if self.enable_span_events {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn build_filter(&self) -> Result<EnvFilter, Box<dyn std::error::Error + Send + Sync>> {
        if let Some(filter) = &self.env_filter {
            return Ok(EnvFilter::try_new(filter)?);
        }
        Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME").replace('-', "_"), self.level))
        }))
    }

    /// Initialize the global tracing subscriber
    pub fn init(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let registry = Registry::default().with(self.build_filter()?);

        if self.log_to_file {
            let log_dir = self.log_directory.as_deref().unwrap_or("logs");
            let file_appender = rolling::daily(log_dir, &self.log_file_prefix);
            let (file_writer, file_guard) = non_blocking(file_appender);
            let file_layer = fmt::layer().json().with_writer(file_writer).with_span_events(self.span_events());

            if self.json_format {
                let console_layer = fmt::layer().json().with_writer(io::stderr).with_span_events(self.span_events());
                registry.with(file_layer).with(console_layer).try_init()?;
            } else {
                let console_layer = fmt::layer()
                    .compact()
                    .with_writer(io::stderr)
                    .with_ansi(self.enable_ansi)
                    .with_span_events(self.span_events());
                registry.with(file_layer).with(console_layer).try_init()?;
            }

            // the writer thread must outlive the process
            std::mem::forget(file_guard);
        } else if self.json_format {
            let layer = fmt::layer().json().with_writer(io::stderr).with_span_events(self.span_events());
            registry.with(layer).try_init()?;
        } else {
            let layer = fmt::layer()
                .compact()
                .with_writer(io::stderr)
                .with_ansi(self.enable_ansi)
                .with_span_events(self.span_events());
            registry.with(layer).try_init()?;
        }

        info!(level = %self.level, json = self.json_format, file = self.log_to_file, "Logging initialized");
        Ok(())
    }

    /// Initialize logging for testing (minimal output)
    pub fn init_test() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Self::new().with_level(Level::WARN).without_ansi().init()
    }
}

/// Macro for creating structured log events with generation context
#[macro_export]
macro_rules! gen_event {
    ($level:ident, $message:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::$level!(
            message = $message,
            component = "generation",
            $($key = $value,)*
        );
    };
    ($level:ident, $message:expr) => {
        tracing::$level!(
            message = $message,
            component = "generation",
        );
    };
}

/// Macro for creating performance measurement spans
#[macro_export]
macro_rules! perf_span {
    ($name:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::info_span!(
            $name,
            component = "performance",
            $($key = $value,)*
        )
    };
    ($name:expr) => {
        tracing::info_span!(
            $name,
            component = "performance",
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_logging_config_creation() {
        let config = LoggingConfig::new();
        assert_eq!(config.level, Level::INFO);
        assert!(!config.json_format);
        assert!(!config.log_to_file);
        assert!(config.log_directory.is_none());
        assert_eq!(config.log_file_prefix, "ecom-synth");
        assert!(!config.enable_span_events);
        assert!(config.enable_ansi);
        assert!(config.env_filter.is_none());
    }

    #[test]
    fn test_logging_config_builder_pattern() {
        let config = LoggingConfig::new()
            .with_level(Level::DEBUG)
            .with_json_format()
            .with_file_logging("test_logs")
            .with_file_prefix("test_prefix")
            .with_span_events()
            .without_ansi()
            .with_env_filter("debug");

        assert_eq!(config.level, Level::DEBUG);
        assert!(config.json_format);
        assert!(config.log_to_file);
        assert_eq!(config.log_directory, Some("test_logs".to_string()));
        assert_eq!(config.log_file_prefix, "test_prefix");
        assert!(config.enable_span_events);
        assert!(!config.enable_ansi);
        assert_eq!(config.env_filter, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_log_dir_enables_file_logging() {
        use clap::Parser;

        let args = CliArgs::try_parse_from(["ecom-synth", "-v", "--log-dir", "run_logs"]).unwrap();
        let config = LoggingConfig::from_cli(&args);
        assert_eq!(config.level, Level::INFO);
        assert!(config.log_to_file);
        assert_eq!(config.log_directory.as_deref(), Some("run_logs"));

        let quiet = LoggingConfig::from_cli(&CliArgs::try_parse_from(["ecom-synth"]).unwrap());
        assert!(!quiet.log_to_file);
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(LoggingConfig::for_verbosity(false, false).level, Level::WARN);
        assert_eq!(LoggingConfig::for_verbosity(true, false).level, Level::INFO);
        let debug = LoggingConfig::for_verbosity(true, true);
        assert_eq!(debug.level, Level::DEBUG);
        assert!(debug.enable_span_events);
    }
}
