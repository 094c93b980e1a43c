//! # Bridge Configuration Module
//!
//! Provides configuration management for the host/native bridge.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! [`BridgeConfig`] holding the user agent, logging settings and the bridge
//! implementations the host provides. It fails fast when a required
//! capability is missing.
//!
//! ## Required Dependencies
//!
//! - `Logger` - Host logging facility receiving forwarded native records
//! - `HttpBackend` - Native HTTP engine
//!
//! ## Optional Dependencies
//!
//! - `ErrorReporter` - Receives absorbed initialization failures
//!
//! When the `desktop-shims` feature is enabled, `ReqwestBackend` (installed
//! as the process-global instance), `ConsoleLogger` and
//! `ConsoleErrorReporter` are injected automatically if not provided. The
//! timeout and retry policy only take effect if no global backend existed
//! yet.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::BridgeConfig;
//! use std::sync::Arc;
//!
//! let config = BridgeConfig::builder()
//!     .user_agent("Firefox-iOS/149.0 (iPhone; iOS 18.2)")
//!     .host_logger(Arc::new(MyLogger))
//!     .http_backend(Arc::new(MyBackend))
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use crate::logging::LoggingConfig;
use bridge_traits::{ErrorReporter, HttpBackend, Level, Logger, RetryPolicy};
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the host/native bridge.
///
/// Use [`BridgeConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct BridgeConfig {
    /// User agent applied to the native HTTP backend
    pub user_agent: String,

    /// Tracing subscriber settings; `None` leaves subscriber setup to the host
    pub logging: Option<LoggingConfig>,

    /// Most verbose native level forwarded to the host logger
    pub forward_max_level: Level,

    /// Request timeout for the desktop backend
    pub http_timeout: Duration,

    /// Retry policy for the desktop backend
    pub retry_policy: RetryPolicy,

    /// Host logging facility (required)
    pub host_logger: Arc<dyn Logger>,

    /// Host error reporting pipeline (optional)
    pub error_reporter: Option<Arc<dyn ErrorReporter>>,

    /// Native HTTP engine (required)
    pub http_backend: Arc<dyn HttpBackend>,
}

impl std::fmt::Debug for BridgeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeConfig")
            .field("user_agent", &self.user_agent)
            .field("logging", &self.logging)
            .field("forward_max_level", &self.forward_max_level)
            .field("http_timeout", &self.http_timeout)
            .field("retry_policy", &self.retry_policy)
            .field("host_logger", &"Logger { ... }")
            .field(
                "error_reporter",
                &self
                    .error_reporter
                    .as_ref()
                    .map(|_| "ErrorReporter { ... }"),
            )
            .field("http_backend", &"HttpBackend { ... }")
            .finish()
    }
}

impl BridgeConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> BridgeConfigBuilder {
        BridgeConfigBuilder::default()
    }
}

/// Builder for [`BridgeConfig`].
#[derive(Default)]
pub struct BridgeConfigBuilder {
    user_agent: Option<String>,
    logging: Option<LoggingConfig>,
    forward_max_level: Option<Level>,
    http_timeout: Option<Duration>,
    retry_policy: Option<RetryPolicy>,
    host_logger: Option<Arc<dyn Logger>>,
    error_reporter: Option<Arc<dyn ErrorReporter>>,
    http_backend: Option<Arc<dyn HttpBackend>>,
}

impl BridgeConfigBuilder {
    /// Sets the user agent (required)
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the tracing subscriber configuration
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Sets the most verbose native level forwarded to the host (default: Debug)
    pub fn forward_max_level(mut self, level: Level) -> Self {
        self.forward_max_level = Some(level);
        self
    }

    /// Sets the request timeout (default: 30s)
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    /// Sets the retry policy
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Sets the host logger
    pub fn host_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.host_logger = Some(logger);
        self
    }

    /// Sets the error reporter
    pub fn error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.error_reporter = Some(reporter);
        self
    }

    /// Sets the HTTP backend
    pub fn http_backend(mut self, backend: Arc<dyn HttpBackend>) -> Self {
        self.http_backend = Some(backend);
        self
    }

    /// Builds the configuration, validating required fields.
    ///
    /// # Errors
    ///
    /// - `Error::Config` if the user agent is missing or malformed
    /// - `Error::CapabilityMissing` if a required bridge is absent and no
    ///   desktop default applies
    pub fn build(self) -> Result<BridgeConfig> {
        let user_agent = self
            .user_agent
            .ok_or_else(|| Error::Config("user_agent is required".to_string()))?;
        validate_user_agent(&user_agent)?;

        let retry_policy = self.retry_policy.unwrap_or_default();
        if retry_policy.max_attempts == 0 {
            return Err(Error::Config(
                "Retry policy must allow at least one attempt".to_string(),
            ));
        }

        let http_timeout = self.http_timeout.unwrap_or(Duration::from_secs(30));
        if http_timeout.is_zero() {
            return Err(Error::Config(
                "HTTP timeout must be greater than zero".to_string(),
            ));
        }

        let host_logger = match self.host_logger {
            Some(logger) => logger,
            None => default_host_logger()?,
        };

        let http_backend = match self.http_backend {
            Some(backend) => backend,
            None => default_http_backend(http_timeout, &retry_policy)?,
        };

        let error_reporter = self.error_reporter.or_else(default_error_reporter);

        Ok(BridgeConfig {
            user_agent,
            logging: self.logging,
            forward_max_level: self.forward_max_level.unwrap_or(Level::Debug),
            http_timeout,
            retry_policy,
            host_logger,
            error_reporter,
            http_backend,
        })
    }
}

/// A user agent must be non-empty, single-line and start with `Product/Version`.
pub fn validate_user_agent(user_agent: &str) -> Result<()> {
    if user_agent.trim().is_empty() {
        return Err(Error::Config("User agent cannot be empty".to_string()));
    }
    if user_agent.contains(['\r', '\n']) {
        return Err(Error::Config(
            "User agent must not contain line breaks".to_string(),
        ));
    }

    let product = user_agent.split_whitespace().next().unwrap_or_default();
    match product.split_once('/') {
        Some((name, version)) if !name.is_empty() && !version.is_empty() => Ok(()),
        _ => Err(Error::Config(
            "User agent must start with 'Product/Version'".to_string(),
        )),
    }
}

#[cfg(feature = "desktop-shims")]
fn default_host_logger() -> Result<Arc<dyn Logger>> {
    Ok(Arc::new(bridge_traits::ConsoleLogger::default()))
}

#[cfg(not(feature = "desktop-shims"))]
fn default_host_logger() -> Result<Arc<dyn Logger>> {
    Err(Error::CapabilityMissing {
        capability: "Logger".to_string(),
        message: "No host logger provided. Desktop: enable the `desktop-shims` feature. \
                  Mobile: inject the platform logger."
            .to_string(),
    })
}

#[cfg(feature = "desktop-shims")]
fn default_http_backend(timeout: Duration, policy: &RetryPolicy) -> Result<Arc<dyn HttpBackend>> {
    let backend =
        bridge_desktop::ReqwestBackend::with_timeout(timeout).with_retry_policy(policy.clone());
    Ok(bridge_desktop::install_global_backend(backend))
}

#[cfg(not(feature = "desktop-shims"))]
fn default_http_backend(_timeout: Duration, _policy: &RetryPolicy) -> Result<Arc<dyn HttpBackend>> {
    Err(Error::CapabilityMissing {
        capability: "HttpBackend".to_string(),
        message: "No HTTP backend provided. Desktop: enable the `desktop-shims` feature. \
                  Mobile: inject the native backend handle."
            .to_string(),
    })
}

#[cfg(feature = "desktop-shims")]
fn default_error_reporter() -> Option<Arc<dyn ErrorReporter>> {
    Some(Arc::new(bridge_traits::ConsoleErrorReporter))
}

#[cfg(not(feature = "desktop-shims"))]
fn default_error_reporter() -> Option<Arc<dyn ErrorReporter>> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::{
        error::Result as BridgeResult, HttpRequest, HttpResponse, LoggerCategory, LoggerLevel,
    };
    use std::collections::HashMap;

    struct NullLogger;

    impl Logger for NullLogger {
        fn log(&self, _: &str, _: LoggerLevel, _: LoggerCategory, _: HashMap<String, String>) {}
    }

    struct NullBackend;

    #[async_trait::async_trait]
    impl HttpBackend for NullBackend {
        fn set_default_user_agent(&self, _user_agent: &str) {}

        fn default_user_agent(&self) -> Option<String> {
            None
        }

        fn activate(&self) -> BridgeResult<()> {
            Ok(())
        }

        fn is_active(&self) -> bool {
            false
        }

        async fn send(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
            Err(bridge_traits::BridgeError::NotInitialized)
        }
    }

    fn complete_builder() -> BridgeConfigBuilder {
        BridgeConfig::builder()
            .user_agent("Firefox-iOS/149.0 (iPhone; iOS 18.2)")
            .host_logger(Arc::new(NullLogger))
            .http_backend(Arc::new(NullBackend))
    }

    #[test]
    fn test_build_with_defaults() {
        let config = complete_builder().build().unwrap();

        assert_eq!(config.user_agent, "Firefox-iOS/149.0 (iPhone; iOS 18.2)");
        assert_eq!(config.forward_max_level, Level::Debug);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.retry_policy, RetryPolicy::default());
        assert!(config.logging.is_none());
    }

    #[test]
    fn test_build_with_overrides() {
        let config = complete_builder()
            .forward_max_level(Level::Warn)
            .http_timeout(Duration::from_secs(5))
            .retry_policy(RetryPolicy::none())
            .logging(LoggingConfig::default().with_forwarding(false))
            .build()
            .unwrap();

        assert_eq!(config.forward_max_level, Level::Warn);
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.retry_policy.max_attempts, 1);
        assert!(!config.logging.unwrap().forward_events);
    }

    #[test]
    fn test_missing_user_agent() {
        let err = BridgeConfig::builder()
            .host_logger(Arc::new(NullLogger))
            .http_backend(Arc::new(NullBackend))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_zero_attempt_policy_rejected() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        };
        let err = complete_builder().retry_policy(policy).build().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = complete_builder()
            .http_timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_validate_user_agent() {
        assert!(validate_user_agent("Firefox-iOS/149.0").is_ok());
        assert!(validate_user_agent("Firefox-iOS/149.0 (iPhone; iOS 18.2)").is_ok());
        assert!(validate_user_agent("").is_err());
        assert!(validate_user_agent("   ").is_err());
        assert!(validate_user_agent("Firefox").is_err());
        assert!(validate_user_agent("/149.0").is_err());
        assert!(validate_user_agent("Firefox/").is_err());
        assert!(validate_user_agent("Firefox/1.0\r\nX-Injected: 1").is_err());
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_missing_logger_is_capability_error() {
        let err = BridgeConfig::builder()
            .user_agent("Firefox-iOS/149.0")
            .http_backend(Arc::new(NullBackend))
            .build()
            .unwrap_err();

        match err {
            Error::CapabilityMissing { capability, .. } => assert_eq!(capability, "Logger"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_missing_backend_is_capability_error() {
        let err = BridgeConfig::builder()
            .user_agent("Firefox-iOS/149.0")
            .host_logger(Arc::new(NullLogger))
            .build()
            .unwrap_err();

        match err {
            Error::CapabilityMissing { capability, .. } => assert_eq!(capability, "HttpBackend"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(feature = "desktop-shims")]
    #[test]
    fn test_desktop_defaults_fill_missing_bridges() {
        let config = BridgeConfig::builder()
            .user_agent("Firefox-iOS/149.0")
            .build()
            .unwrap();

        assert!(config.error_reporter.is_some());
    }
}
