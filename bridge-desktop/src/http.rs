//! HTTP Backend Implementation using Reqwest

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    http::{HttpBackend, HttpMethod, HttpRequest, HttpResponse, RetryPolicy, USER_AGENT_HEADER},
};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Reqwest-based HTTP backend
///
/// The engine (a pooled `reqwest::Client`) is built on the first successful
/// [`activate`](HttpBackend::activate) and kept for the life of the backend.
/// The default user agent is independent of activation and may be replaced
/// at any time; each request reads the current value.
pub struct ReqwestBackend {
    user_agent: RwLock<Option<String>>,
    engine: OnceLock<Client>,
    timeout: Duration,
    retry_policy: RetryPolicy,
}

impl ReqwestBackend {
    /// Create a backend with default configuration
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a backend with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            user_agent: RwLock::new(None),
            engine: OnceLock::new(),
            timeout,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Override the retry policy used by [`send`](HttpBackend::send)
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    fn build_engine(&self) -> Result<Client> {
        Client::builder()
            .timeout(self.timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| BridgeError::Initialization(e.to_string()))
    }

    /// Convert bridge HttpMethod to reqwest Method
    fn convert_method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
        }
    }

    /// Build reqwest request from bridge request
    fn build_request(&self, client: &Client, request: HttpRequest) -> reqwest::RequestBuilder {
        let method = Self::convert_method(request.method);
        let mut req = client.request(method, &request.url);

        if !request.has_user_agent() {
            if let Some(user_agent) = self.default_user_agent() {
                req = req.header(USER_AGENT_HEADER, user_agent);
            }
        }

        for (key, value) in request.headers {
            req = req.header(key, value);
        }

        if let Some(body) = request.body {
            req = req.body(body);
        }

        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        req
    }

    async fn send_with_retry(&self, client: &Client, request: HttpRequest) -> Result<HttpResponse> {
        let policy = &self.retry_policy;
        let mut attempt = 0;
        let mut last_error = None;

        while attempt < policy.max_attempts {
            debug!(
                attempt = attempt + 1,
                max_attempts = policy.max_attempts,
                url = %request.url,
                "Executing HTTP request"
            );

            match self.build_request(client, request.clone()).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();

                    if status >= 500 || status == 429 {
                        warn!(
                            status = status,
                            attempt = attempt + 1,
                            "HTTP request failed with retryable status"
                        );
                        last_error = Some(BridgeError::Status(status));
                    } else {
                        let headers: HashMap<String, String> = response
                            .headers()
                            .iter()
                            .filter_map(|(k, v)| {
                                v.to_str().ok().map(|s| (k.to_string(), s.to_string()))
                            })
                            .collect();

                        let body = response
                            .bytes()
                            .await
                            .map_err(|e| BridgeError::Network(e.to_string()))?;

                        return Ok(HttpResponse {
                            status,
                            headers,
                            body,
                        });
                    }
                }
                Err(e) => {
                    warn!(error = %e, attempt = attempt + 1, "HTTP request failed");

                    if e.is_builder() {
                        return Err(BridgeError::InvalidRequest(e.to_string()));
                    }
                    last_error = Some(if e.is_timeout() {
                        BridgeError::Network("Request timed out".to_string())
                    } else if e.is_connect() {
                        BridgeError::Network(format!("Connection failed: {}", e))
                    } else {
                        BridgeError::Network(e.to_string())
                    });
                }
            }

            attempt += 1;

            if attempt < policy.max_attempts {
                let delay = policy.delay_for(attempt);
                debug!(delay_ms = delay.as_millis(), "Retrying after delay");
                sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            BridgeError::Network("All retry attempts exhausted".to_string())
        }))
    }
}

impl Default for ReqwestBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    fn set_default_user_agent(&self, user_agent: &str) {
        let mut guard = self
            .user_agent
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Some(user_agent.to_string());
    }

    fn default_user_agent(&self) -> Option<String> {
        self.user_agent
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn activate(&self) -> Result<()> {
        if self.engine.get().is_some() {
            return Err(BridgeError::AlreadyInitialized);
        }

        let client = self.build_engine()?;
        // A concurrent activation may have won between the check and here.
        self.engine
            .set(client)
            .map_err(|_| BridgeError::AlreadyInitialized)?;

        info!(timeout_secs = self.timeout.as_secs(), "HTTP backend activated");
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.engine.get().is_some()
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let client = self.engine.get().ok_or(BridgeError::NotInitialized)?;
        self.send_with_retry(client, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_activation_reports_already_initialized() {
        let backend = ReqwestBackend::new();
        assert!(!backend.is_active());

        backend.activate().unwrap();
        assert!(backend.is_active());

        let err = backend.activate().unwrap_err();
        assert!(err.is_already_initialized());
        assert!(backend.is_active());
    }

    #[test]
    fn test_user_agent_last_write_wins() {
        let backend = ReqwestBackend::new();
        assert_eq!(backend.default_user_agent(), None);

        backend.set_default_user_agent("Firefox-iOS/148.0");
        backend.activate().unwrap();
        backend.set_default_user_agent("Firefox-iOS/149.0");

        assert_eq!(
            backend.default_user_agent(),
            Some("Firefox-iOS/149.0".to_string())
        );
    }

    #[tokio::test]
    async fn test_send_before_activation_fails() {
        let backend = ReqwestBackend::new();
        let err = backend.get("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(err, BridgeError::NotInitialized));
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(
            ReqwestBackend::convert_method(HttpMethod::Get),
            reqwest::Method::GET
        );
        assert_eq!(
            ReqwestBackend::convert_method(HttpMethod::Post),
            reqwest::Method::POST
        );
        assert_eq!(
            ReqwestBackend::convert_method(HttpMethod::Head),
            reqwest::Method::HEAD
        );
    }
}
