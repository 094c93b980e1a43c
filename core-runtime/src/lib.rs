//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the bridge crates:
//! - Logging and tracing infrastructure
//! - Native log emission into a registered foreign logger
//! - Configuration management
//!
//! ## Overview
//!
//! This crate owns the process-wide pieces every bridge component depends on:
//! the `tracing` subscriber, the registry through which native log records
//! reach the host, and the validated [`BridgeConfig`](config::BridgeConfig).

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
