//! # Logging & Tracing Infrastructure
//!
//! Provides structured logging with the `tracing` crate, supporting:
//! - JSON and pretty-print output formats
//! - Module-level filtering
//! - Delivery of native log events to a host-registered
//!   [`AppServicesLogger`](bridge_traits::AppServicesLogger)
//!
//! ## Overview
//!
//! Native code logs through `tracing` (or the `log` facade). Every event
//! that survives filtering is turned into a [`Record`] and handed,
//! synchronously and on the emitting thread, to whichever foreign logger is
//! registered in the [`ForeignLoggerRegistry`]. Two entry points feed the
//! registry:
//!
//! - [`AppServicesLayer`], a `tracing-subscriber` layer installed by
//!   [`init_logging`] when `forward_events` is set;
//! - [`LogAdapter`], a `log::Log` implementation installed by
//!   [`install_log_adapter`] for hosts that do not run a tracing subscriber.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::logging::{init_logging, set_logger, set_max_level, LoggingConfig};
//! use bridge_traits::Level;
//! use std::sync::Arc;
//!
//! init_logging(LoggingConfig::default().with_forwarding(true))?;
//! set_logger(Some(Arc::new(MyForwarder::new())));
//! set_max_level(Level::Info);
//!
//! tracing::warn!(target: "sync_manager", "sync failed");
//! ```

use crate::error::{Error, Result};

use bridge_traits::foreign_logger::{AppServicesLogger, Level, Record};

use std::cell::Cell;
use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::{
    filter::EnvFilter,
    layer::{Context, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
    Layer,
};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format with colors
    Pretty,
    /// Structured JSON format for machine parsing
    Json,
    /// Compact format for production
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        return Self::Pretty;

        #[cfg(not(debug_assertions))]
        return Self::Json;
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Output format
    pub format: LogFormat,
    /// Minimum log level
    pub level: Level,
    /// Custom filter string (e.g., "core_service=debug,bridge_desktop=trace")
    pub filter: Option<String>,
    /// Mirror events into the registered foreign logger
    pub forward_events: bool,
    /// Enable span contexts
    pub enable_spans: bool,
    /// Display target module in logs
    pub display_target: bool,
    /// Display thread info
    pub display_thread_info: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: Level::Info,
            filter: None,
            forward_events: true,
            enable_spans: true,
            display_target: true,
            display_thread_info: false,
        }
    }
}

impl LoggingConfig {
    /// Set log format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set minimum log level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set custom filter string
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Enable or disable forwarding to the foreign logger
    pub fn with_forwarding(mut self, forward: bool) -> Self {
        self.forward_events = forward;
        self
    }

    /// Enable or disable span contexts
    pub fn with_spans(mut self, enable: bool) -> Self {
        self.enable_spans = enable;
        self
    }

    /// Enable or disable target display
    pub fn with_target(mut self, display: bool) -> Self {
        self.display_target = display;
        self
    }

    /// Enable or disable thread info
    pub fn with_thread_info(mut self, display: bool) -> Self {
        self.display_thread_info = display;
        self
    }
}

/// Initialize the logging system
///
/// This should be called once during application startup. Subsequent calls
/// will return an error; check [`is_logging_initialized`] first to reuse an
/// existing subscriber.
///
/// # Errors
///
/// Returns an error if:
/// - `Error::Logging`: a global subscriber is already installed
/// - `Error::Config`: the filter string is invalid
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = build_filter(&config)?;
    let forward = config
        .forward_events
        .then(|| AppServicesLayer::new(global_registry()));

    let result = match config.format {
        LogFormat::Pretty => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .pretty()
                .with_target(config.display_target)
                .with_thread_ids(config.display_thread_info)
                .with_thread_names(config.display_thread_info)
                .with_span_events(if config.enable_spans {
                    tracing_subscriber::fmt::format::FmtSpan::ACTIVE
                } else {
                    tracing_subscriber::fmt::format::FmtSpan::NONE
                })
                .with_writer(io::stdout);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .with(forward)
                .try_init()
        }
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(config.enable_spans)
                .with_span_list(config.enable_spans)
                .with_target(config.display_target)
                .with_thread_ids(config.display_thread_info)
                .with_thread_names(config.display_thread_info)
                .with_writer(io::stdout);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .with(forward)
                .try_init()
        }
        LogFormat::Compact => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .compact()
                .with_target(config.display_target)
                .with_thread_ids(config.display_thread_info)
                .with_thread_names(config.display_thread_info)
                .with_writer(io::stdout);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .with(forward)
                .try_init()
        }
    };

    result.map_err(|e| Error::Logging(format!("Failed to initialize logging: {}", e)))?;
    SUBSCRIBER_INSTALLED.store(true, Ordering::Release);
    Ok(())
}

/// Whether [`init_logging`] has installed the global subscriber.
pub fn is_logging_initialized() -> bool {
    SUBSCRIBER_INSTALLED.load(Ordering::Acquire)
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let base_level = match config.level {
        Level::Trace => "trace",
        Level::Debug => "debug",
        Level::Info => "info",
        Level::Warn => "warn",
        Level::Error => "error",
    };

    let filter_string = if let Some(custom_filter) = &config.filter {
        custom_filter.clone()
    } else {
        // Default filter: everything at the base level, chatty dependencies at warn
        format!("{base_level},h2=warn,hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn")
    };

    EnvFilter::try_new(filter_string)
        .map_err(|e| Error::Config(format!("Invalid log filter: {}", e)))
}

static SUBSCRIBER_INSTALLED: AtomicBool = AtomicBool::new(false);

thread_local! {
    static DISPATCHING: Cell<bool> = const { Cell::new(false) };
}

/// Clears the per-thread dispatch flag even if the foreign logger panics.
struct DispatchGuard;

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        DISPATCHING.with(|flag| flag.set(false));
    }
}

/// Holds the foreign logger registered by the host and the most verbose
/// level it wants to receive.
pub struct ForeignLoggerRegistry {
    logger: RwLock<Option<Arc<dyn AppServicesLogger>>>,
    max_level: RwLock<Level>,
}

impl fmt::Debug for ForeignLoggerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeignLoggerRegistry")
            .field(
                "logger",
                &self.logger().as_ref().map(|_| "AppServicesLogger { ... }"),
            )
            .field("max_level", &self.max_level())
            .finish()
    }
}

impl Default for ForeignLoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ForeignLoggerRegistry {
    pub fn new() -> Self {
        Self {
            logger: RwLock::new(None),
            max_level: RwLock::new(Level::Debug),
        }
    }

    /// Register a logger, or unregister with `None`.
    pub fn set_logger(&self, logger: Option<Arc<dyn AppServicesLogger>>) {
        *self.logger.write().unwrap_or_else(PoisonError::into_inner) = logger;
    }

    /// Records less severe than `level` are dropped before dispatch.
    pub fn set_max_level(&self, level: Level) {
        *self.max_level.write().unwrap_or_else(PoisonError::into_inner) = level;
    }

    pub fn max_level(&self) -> Level {
        *self.max_level.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn logger(&self) -> Option<Arc<dyn AppServicesLogger>> {
        self.logger
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn has_logger(&self) -> bool {
        self.logger().is_some()
    }

    /// Whether a record at `level` would currently be delivered.
    pub fn is_enabled(&self, level: Level) -> bool {
        level >= self.max_level() && self.has_logger()
    }

    /// Hand a record to the registered logger.
    ///
    /// Returns `false` when the record was dropped: no logger, below the
    /// threshold, or emitted from inside the logger itself on this thread.
    pub fn dispatch(&self, record: Record) -> bool {
        if record.level < self.max_level() {
            return false;
        }
        let Some(logger) = self.logger() else {
            return false;
        };

        if DISPATCHING.with(|flag| flag.replace(true)) {
            return false;
        }
        let _guard = DispatchGuard;
        logger.log(record);
        true
    }
}

static GLOBAL_REGISTRY: OnceLock<Arc<ForeignLoggerRegistry>> = OnceLock::new();

/// The process-wide registry used by [`init_logging`] and [`install_log_adapter`].
pub fn global_registry() -> Arc<ForeignLoggerRegistry> {
    Arc::clone(GLOBAL_REGISTRY.get_or_init(|| Arc::new(ForeignLoggerRegistry::new())))
}

/// Register the process-wide foreign logger, or unregister with `None`.
pub fn set_logger(logger: Option<Arc<dyn AppServicesLogger>>) {
    global_registry().set_logger(logger);
}

/// Set the most verbose level delivered to the process-wide foreign logger.
pub fn set_max_level(level: Level) {
    global_registry().set_max_level(level);
    log::set_max_level(level.to_level_filter());
}

/// Layer that forwards events to the foreign logger of a registry.
pub struct AppServicesLayer {
    registry: Arc<ForeignLoggerRegistry>,
}

impl AppServicesLayer {
    pub fn new(registry: Arc<ForeignLoggerRegistry>) -> Self {
        Self { registry }
    }
}

impl<S> Layer<S> for AppServicesLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = tracing_level_to_level(*metadata.level());

        if !self.registry.is_enabled(level) {
            return;
        }

        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);

        let record = Record::new(level, metadata.target(), visitor.into_message(metadata.name()));
        self.registry.dispatch(record);
    }
}

#[derive(Default)]
struct RecordVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl RecordVisitor {
    fn record_value(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }

    /// Message followed by `key=value` pairs for any structured fields.
    fn into_message(self, fallback: &str) -> String {
        let mut message = self.message.unwrap_or_else(|| fallback.to_string());
        for (key, value) in self.fields {
            message.push(' ');
            message.push_str(&key);
            message.push('=');
            message.push_str(&value);
        }
        message
    }
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_value(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_value(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_value(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record_value(field, value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.record_value(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.record_value(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_value(field, format!("{:?}", value));
    }
}

fn tracing_level_to_level(level: tracing::Level) -> Level {
    match level {
        tracing::Level::TRACE => Level::Trace,
        tracing::Level::DEBUG => Level::Debug,
        tracing::Level::INFO => Level::Info,
        tracing::Level::WARN => Level::Warn,
        tracing::Level::ERROR => Level::Error,
    }
}

/// `log` facade implementation feeding a registry.
pub struct LogAdapter {
    registry: Arc<ForeignLoggerRegistry>,
}

impl LogAdapter {
    pub fn new(registry: Arc<ForeignLoggerRegistry>) -> Self {
        Self { registry }
    }
}

impl log::Log for LogAdapter {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.registry.is_enabled(metadata.level().into())
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            self.registry.dispatch(Record::from(record));
        }
    }

    fn flush(&self) {}
}

/// Route the `log` facade into the process-wide registry.
///
/// Not needed after [`init_logging`], whose subscriber already captures
/// `log` records.
///
/// # Errors
///
/// Returns an error if another `log` logger is already installed.
pub fn install_log_adapter() -> Result<()> {
    let registry = global_registry();
    let max_level = registry.max_level();
    log::set_boxed_logger(Box::new(LogAdapter::new(registry)))
        .map_err(|e| Error::Logging(format!("Failed to install log adapter: {}", e)))?;
    log::set_max_level(max_level.to_level_filter());
    Ok(())
}
