//! Host Logging Abstractions
//!
//! The host application's logging taxonomy and the sinks the bridge forwards
//! into.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;

/// Host log level
///
/// Coarser than the native [`Level`](crate::foreign_logger::Level): the host
/// pipeline only distinguishes three severities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggerLevel {
    Debug,
    Info,
    Warning,
}

impl LoggerLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

/// Host log category tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggerCategory {
    /// Startup and component wiring
    Setup,
    /// Native sync and storage components
    Sync,
    Storage,
    Network,
    Lifecycle,
}

impl LoggerCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Sync => "sync",
            Self::Storage => "storage",
            Self::Network => "network",
            Self::Lifecycle => "lifecycle",
        }
    }
}

/// Host logger trait
///
/// The host application's logging facility. Forwarded native records land
/// here, possibly from several native threads at once, so implementations
/// must be safe for concurrent use.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::host::{Logger, LoggerCategory, LoggerLevel};
/// use std::collections::HashMap;
///
/// fn report_slow_sync(logger: &dyn Logger) {
///     let extra = HashMap::from([("target".to_string(), "sync_manager".to_string())]);
///     logger.log("Sync took 12s", LoggerLevel::Warning, LoggerCategory::Sync, extra);
/// }
/// ```
pub trait Logger: Send + Sync {
    fn log(
        &self,
        message: &str,
        level: LoggerLevel,
        category: LoggerCategory,
        extra: HashMap<String, String>,
    );
}

/// Failure handed to the host's crash/error reporting pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub category: LoggerCategory,
    pub message: String,
    pub extra: HashMap<String, String>,
}

impl ErrorReport {
    pub fn new(category: LoggerCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            extra: HashMap::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Error reporter trait
///
/// Receives bridge failures that are absorbed at the boundary but still
/// deserve attention (Sentry on mobile, stderr on desktop).
pub trait ErrorReporter: Send + Sync {
    fn report(&self, report: ErrorReport);
}

/// Console logger implementation for testing/development
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    pub min_level: LoggerLevel,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self {
            min_level: LoggerLevel::Info,
        }
    }
}

impl ConsoleLogger {
    pub fn new(min_level: LoggerLevel) -> Self {
        Self { min_level }
    }

    /// Render a single log line without the timestamp prefix.
    pub fn format_line(
        message: &str,
        level: LoggerLevel,
        category: LoggerCategory,
        extra: &HashMap<String, String>,
    ) -> String {
        let mut line = format!("{} [{}] {}", level.as_str(), category.as_str(), message);
        if !extra.is_empty() {
            // BTreeMap keeps the rendered keys stable
            let sorted: std::collections::BTreeMap<_, _> = extra.iter().collect();
            if let Ok(json) = serde_json::to_string(&sorted) {
                line.push(' ');
                line.push_str(&json);
            }
        }
        line
    }
}

impl Logger for ConsoleLogger {
    fn log(
        &self,
        message: &str,
        level: LoggerLevel,
        category: LoggerCategory,
        extra: HashMap<String, String>,
    ) {
        if level < self.min_level {
            return;
        }

        let line = Self::format_line(message, level, category, &extra);
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(
            stdout,
            "[{}] {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            line
        );
    }
}

/// Error reporter that writes reports to stderr
#[derive(Debug, Clone, Default)]
pub struct ConsoleErrorReporter;

impl ErrorReporter for ConsoleErrorReporter {
    fn report(&self, report: ErrorReport) {
        eprintln!(
            "[{}] error report ({}): {} {:?}",
            Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            report.category.as_str(),
            report.message,
            report.extra
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_level_ordering() {
        assert!(LoggerLevel::Debug < LoggerLevel::Info);
        assert!(LoggerLevel::Info < LoggerLevel::Warning);
    }

    #[test]
    fn test_format_line_with_extra() {
        let extra = HashMap::from([
            ("target".to_string(), "sync_manager".to_string()),
            ("attempt".to_string(), "2".to_string()),
        ]);
        let line = ConsoleLogger::format_line(
            "sync failed",
            LoggerLevel::Warning,
            LoggerCategory::Sync,
            &extra,
        );

        assert_eq!(
            line,
            r#"WARNING [sync] sync failed {"attempt":"2","target":"sync_manager"}"#
        );
    }

    #[test]
    fn test_format_line_without_extra() {
        let line = ConsoleLogger::format_line(
            "ready",
            LoggerLevel::Info,
            LoggerCategory::Setup,
            &HashMap::new(),
        );
        assert_eq!(line, "INFO [setup] ready");
    }

    #[test]
    fn test_error_report_builder() {
        let report = ErrorReport::new(LoggerCategory::Setup, "backend failed")
            .with_extra("user_agent", "Firefox-iOS/149.0");

        assert_eq!(report.category, LoggerCategory::Setup);
        assert_eq!(report.message, "backend failed");
        assert_eq!(
            report.extra.get("user_agent"),
            Some(&"Firefox-iOS/149.0".to_string())
        );
    }

    #[test]
    fn test_console_logger_accepts_records() {
        let logger = ConsoleLogger::new(LoggerLevel::Debug);
        logger.log(
            "Test log",
            LoggerLevel::Info,
            LoggerCategory::Sync,
            HashMap::new(),
        );
        ConsoleErrorReporter.report(ErrorReport::new(LoggerCategory::Setup, "Test report"));
    }
}
