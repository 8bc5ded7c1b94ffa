//! Log level handling and subscriber installation.
//!
//! Levels arrive in the JVM vocabulary operators already use for the helper
//! process (`ALL`, `WARNING`, `SEVERE`, ...) and are mapped onto `tracing`
//! levels. Only the binary installs a subscriber; library code just emits.

use crate::shared::error::CollectorError;
use std::path::Path;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const LOG_FILE_NAME: &str = "jmx-collector.log";

/// Parse a configured level into a tracing `Level`.
pub fn parse_log_level(level: &str) -> Result<Level, CollectorError> {
    match level.trim().to_lowercase().as_str() {
        "trace" | "finest" => Ok(Level::TRACE),
        "all" | "debug" | "fine" | "finer" | "config" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" | "severe" => Ok(Level::ERROR),
        _ => Err(CollectorError::config(
            "log_level",
            format!(
                "Invalid log level: {}. Use ALL, DEBUG, INFO, WARNING or ERROR",
                level
            ),
        )),
    }
}

/// JVM `java.util.logging` level name for the helper's logging config.
pub fn jvm_level_name(level: Level) -> &'static str {
    match level {
        Level::TRACE => "FINEST",
        Level::DEBUG => "FINE",
        Level::INFO => "INFO",
        Level::WARN => "WARNING",
        _ => "SEVERE",
    }
}

/// Install the process-wide subscriber: stderr plus a log file in `log_dir`.
///
/// `JMX_COLLECTOR_LOG` overrides the configured level when set.
pub fn init_logging(level: Level, log_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(log_dir).map_err(|e| CollectorError::FileWriteError {
        path: log_dir.to_path_buf(),
        details: e.to_string(),
    })?;

    let filter = EnvFilter::try_from_env("JMX_COLLECTOR_LOG")
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let file = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true);
    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    Registry::default()
        .with(filter)
        .with(stderr)
        .with(file)
        .try_init()?;

    tracing::debug!("Logging initialized with level: {}", level);
    Ok(())
}
