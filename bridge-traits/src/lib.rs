//! # Host Bridge Traits
//!
//! Contracts on both sides of the seam between a host application and its
//! embedded native component.
//!
//! ## Overview
//!
//! The native component exposes an HTTP engine and emits structured log
//! records; the host application owns a logging taxonomy and an error
//! reporting pipeline. This crate defines the types that cross that boundary
//! so the bridge crates can be written and tested against traits instead of
//! concrete platform code.
//!
//! ## Traits
//!
//! ### Native side
//! - [`HttpBackend`](http::HttpBackend) - HTTP engine with a default user agent and one-shot activation
//! - [`AppServicesLogger`](foreign_logger::AppServicesLogger) - Callback receiving native [`Record`](foreign_logger::Record)s
//!
//! ### Host side
//! - [`Logger`](host::Logger) - Host logging facility (`os_log`, Logcat, console)
//! - [`ErrorReporter`](host::ErrorReporter) - Crash/error reporting pipeline
//!
//! ## Error Handling
//!
//! All fallible native operations use [`BridgeError`](error::BridgeError).
//! Activation distinguishes [`BridgeError::AlreadyInitialized`], which is
//! expected on repeat calls, from every other failure.
//!
//! ## Thread Safety
//!
//! Every trait requires `Send + Sync`: the native component calls into the
//! host from its own thread pool.

pub mod error;
pub mod foreign_logger;
pub mod host;
pub mod http;

pub use error::BridgeError;

// Re-export commonly used types
pub use foreign_logger::{AppServicesLogger, Level, Record};
pub use host::{
    ConsoleErrorReporter, ConsoleLogger, ErrorReport, ErrorReporter, Logger, LoggerCategory,
    LoggerLevel,
};
pub use http::{HttpBackend, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
