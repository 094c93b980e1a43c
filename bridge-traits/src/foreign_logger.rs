//! Native Log Records
//!
//! The record shape the native component emits and the callback interface the
//! host registers to receive them.

use serde::{Deserialize, Serialize};

/// Severity of a native log record, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace => Self::Trace,
            log::Level::Debug => Self::Debug,
            log::Level::Info => Self::Info,
            log::Level::Warn => Self::Warn,
            log::Level::Error => Self::Error,
        }
    }
}

impl Level {
    /// The equivalent `log` crate filter, used when installing the facade adapter.
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Trace => log::LevelFilter::Trace,
            Self::Debug => log::LevelFilter::Debug,
            Self::Info => log::LevelFilter::Info,
            Self::Warn => log::LevelFilter::Warn,
            Self::Error => log::LevelFilter::Error,
        }
    }
}

/// A single structured log event produced by the native component.
///
/// Exposes its data as fields rather than accessor methods so it can cross
/// the foreign boundary by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl Record {
    pub fn new(level: Level, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            target: target.into(),
            message: message.into(),
        }
    }
}

impl From<&log::Record<'_>> for Record {
    fn from(record: &log::Record<'_>) -> Self {
        Self {
            level: record.level().into(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        }
    }
}

/// Callback interface implemented by the host and registered with the
/// native component's logging subsystem.
///
/// The native side may call [`log`](AppServicesLogger::log) concurrently from
/// any of its internal threads. Implementations must not panic back into the
/// caller.
pub trait AppServicesLogger: Send + Sync {
    fn log(&self, record: Record);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn test_record_from_log_record() {
        let record = Record::from(
            &log::Record::builder()
                .level(log::Level::Warn)
                .target("places::storage")
                .args(format_args!("fetched {} items", 3))
                .build(),
        );
        assert_eq!(record.level, Level::Warn);
        assert_eq!(record.target, "places::storage");
        assert_eq!(record.message, "fetched 3 items");
    }

    #[test]
    fn test_level_serializes_lowercase() {
        let json = serde_json::to_string(&Level::Warn).unwrap();
        assert_eq!(json, "\"warn\"");
        let level: Level = serde_json::from_str("\"trace\"").unwrap();
        assert_eq!(level, Level::Trace);
    }

    #[test]
    fn test_level_filter_conversion() {
        assert_eq!(Level::Info.to_level_filter(), log::LevelFilter::Info);
        assert_eq!(Level::Trace.to_level_filter(), log::LevelFilter::Trace);
    }
}
