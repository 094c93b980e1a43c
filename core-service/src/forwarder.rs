//! Forwarding of native log records into the host logger.

use bridge_traits::{AppServicesLogger, Level, Logger, LoggerCategory, LoggerLevel, Record};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::error;

/// Key under which the record's origin is passed in the host `extra` map.
pub const TARGET_KEY: &str = "target";

/// Adapter registered with the native logging subsystem.
///
/// Every record is translated and handed to the host logger immediately, on
/// the native thread that emitted it. All records land in
/// [`LoggerCategory::Sync`].
pub struct ForwardOnLog {
    logger: Arc<dyn Logger>,
}

impl ForwardOnLog {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }
}

/// Map a native level onto the host's coarser taxonomy.
///
/// `Error` is folded into `Warning` on purpose; the host has no error level
/// that stays out of crash reporting.
pub fn rust_level_to_logger_level(level: Level) -> LoggerLevel {
    match level {
        Level::Trace => LoggerLevel::Debug,
        Level::Debug => LoggerLevel::Debug,
        Level::Info => LoggerLevel::Info,
        Level::Warn => LoggerLevel::Warning,
        Level::Error => LoggerLevel::Warning,
    }
}

impl AppServicesLogger for ForwardOnLog {
    fn log(&self, record: Record) {
        let level = rust_level_to_logger_level(record.level);
        let target = record.target;
        let extra = HashMap::from([(TARGET_KEY.to_string(), target.clone())]);

        // A panic must not unwind into the native caller.
        let forwarded = panic::catch_unwind(AssertUnwindSafe(|| {
            self.logger
                .log(&record.message, level, LoggerCategory::Sync, extra)
        }));

        // Runs inside registry dispatch, which drops this event for the
        // foreign logger on this thread.
        if forwarded.is_err() {
            error!(
                record_target = %target,
                "Host logger panicked while forwarding a native log record"
            );
        }
    }
}
