//! Structured logging setup
//!
//! Logs always go to stderr. Stdout is reserved for the build result so the
//! lifecycle side can consume it unchanged.
//!
//! # Example
//!
//! ```no_run
//! use spring_boot_buildpack::util::logging::{init_logging, LoggingConfig};
//! use tracing::Level;
//!
//! // With environment: BP_LOG_JSON=true
//! init_logging(LoggingConfig::from_env(Level::DEBUG));
//!
//! tracing::info!(path = "/workspace", "Contributing Spring Boot metadata");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_JSON_ENV: &str = "BP_LOG_JSON";

/// Library and binary targets whose level follows `LoggingConfig::level`.
const TARGETS: [&str; 2] = ["spring_boot_buildpack", "spring_boot_build"];

static INIT: Once = Once::new();

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for this crate's events
    pub level: Level,

    /// Emit one JSON object per event
    pub use_json: bool,

    /// Include the module target (e.g. spring_boot_buildpack::pipeline) in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: false,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Settings for the given level, with JSON output taken from `BP_LOG_JSON`.
    pub fn from_env(level: Level) -> Self {
        let use_json = env::var(LOG_JSON_ENV)
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Self {
            level,
            use_json,
            ..Default::default()
        }
    }

    fn directives(&self) -> Vec<String> {
        TARGETS
            .iter()
            .map(|target| format!("{}={}", target, self.level))
            .collect()
    }
}

/// Parses a log level, falling back to INFO for anything unrecognised.
///
/// ```
/// use spring_boot_buildpack::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("WARN"), Level::WARN);
/// assert_eq!(parse_level("loud"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// Installs the global subscriber. Only the first call has any effect.
///
/// `RUST_LOG` directives are honoured; the crate's own level is then set
/// from `config.level`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();
        for directive in config.directives() {
            match directive.parse() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(e) => eprintln!("Ignoring log directive: {}", e),
            }
        }

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        }
    });
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "t" | "1")
}
