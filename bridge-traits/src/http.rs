//! HTTP Backend Abstraction
//!
//! The native component's HTTP engine: a process-wide default user agent, a
//! one-shot activation step, and request execution once active.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{BridgeError, Result};

pub const USER_AGENT_HEADER: &str = "User-Agent";

/// HTTP method types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

/// HTTP request builder
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Bytes>,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let json = serde_json::to_vec(body).map_err(|e| {
            BridgeError::InvalidRequest(format!("JSON serialization failed: {}", e))
        })?;
        self.body = Some(Bytes::from(json));
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        Ok(self)
    }

    pub fn body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Whether a `User-Agent` header was set explicitly (case-insensitive).
    pub fn has_user_agent(&self) -> bool {
        self.headers
            .keys()
            .any(|key| key.eq_ignore_ascii_case(USER_AGENT_HEADER))
    }
}

/// HTTP response
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl HttpResponse {
    /// Parse response body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            BridgeError::InvalidRequest(format!("JSON deserialization failed: {}", e))
        })
    }

    /// Get response body as UTF-8 string
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| BridgeError::InvalidRequest(format!("Invalid UTF-8: {}", e)))
    }

    /// Check if response status is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if response status indicates a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first
    pub max_attempts: u32,
    /// Base delay between retries
    pub base_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Whether to use exponential backoff
    pub use_exponential_backoff: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
            use_exponential_backoff: true,
        }
    }
}

impl RetryPolicy {
    /// A policy that sends exactly once.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay to wait after the given (1-based) failed attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if self.use_exponential_backoff {
            let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
            self.base_delay.saturating_mul(factor).min(self.max_delay)
        } else {
            self.base_delay
        }
    }
}

/// Native HTTP backend trait
///
/// Models the native component's HTTP engine. The engine carries a
/// process-wide default user agent that may be replaced at any time, and must
/// be activated before requests can be sent. Activation succeeds once; every
/// later call fails with [`BridgeError::AlreadyInitialized`], which callers
/// are expected to tell apart from genuine initialization failures.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::http::{HttpBackend, HttpRequest, HttpMethod};
///
/// async fn fetch(backend: &dyn HttpBackend) -> Result<String> {
///     backend.set_default_user_agent("Firefox-iOS/149.0");
///     match backend.activate() {
///         Ok(()) | Err(BridgeError::AlreadyInitialized) => {}
///         Err(e) => return Err(e),
///     }
///     let response = backend.get("https://example.com/data").await?;
///     response.text()
/// }
/// ```
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Replace the user agent sent with requests that do not set their own.
    fn set_default_user_agent(&self, user_agent: &str);

    /// Current default user agent, if one was ever set.
    fn default_user_agent(&self) -> Option<String>;

    /// Activate the HTTP engine.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::AlreadyInitialized`] on any call after the first success
    /// - [`BridgeError::Initialization`] if the engine could not be built
    fn activate(&self) -> Result<()>;

    /// Whether [`activate`](HttpBackend::activate) has succeeded.
    fn is_active(&self) -> bool;

    /// Execute an HTTP request on the active engine.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotInitialized`] before activation, or a network
    /// error once retries are exhausted.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Convenience GET request
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.send(HttpRequest::new(HttpMethod::Get, url)).await
    }
}
