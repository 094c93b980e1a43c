//! Core service façade and bootstrap helpers.
//!
//! This crate wires the host-provided bridges (host logger, error reporter,
//! native HTTP backend) together at startup:
//!
//! - [`Viaduct`] activates the native HTTP backend exactly once per process
//!   and keeps its user agent current.
//! - [`ForwardOnLog`] is registered with the native logging subsystem and
//!   re-emits every native record through the host logger.
//!
//! Desktop apps typically enable the `desktop-shims` feature, which supplies
//! a `reqwest` backend and console sinks for anything the host leaves out.
//!
//! ```ignore
//! use core_runtime::config::BridgeConfig;
//! use core_service::CoreService;
//!
//! let config = BridgeConfig::builder()
//!     .user_agent("Firefox-iOS/149.0 (iPhone; iOS 18.2)")
//!     .build()?;
//! let core = CoreService::bootstrap(config)?;
//! ```

pub mod error;
pub mod forwarder;
pub mod viaduct;

pub use error::{CoreError, Result};
pub use forwarder::{rust_level_to_logger_level, ForwardOnLog};
pub use viaduct::Viaduct;

use std::sync::Arc;

use bridge_traits::HttpBackend;
use core_runtime::config::{BridgeConfig, BridgeConfigBuilder};
use core_runtime::logging;
use tracing::{debug, info, warn};

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CoreService {
    config: Arc<BridgeConfig>,
    viaduct: Arc<Viaduct>,
    forwarder: Arc<ForwardOnLog>,
}

impl CoreService {
    /// Bring the bridge up for this process.
    ///
    /// Installs the tracing subscriber when `config.logging` is set and no
    /// earlier bootstrap installed one, registers a [`ForwardOnLog`] as the
    /// process-wide foreign logger, installs the process-wide [`Viaduct`]
    /// and initializes it with the configured user agent.
    ///
    /// Calling this again re-registers the forwarder and re-applies the user
    /// agent; the first installed subscriber and `Viaduct` stay in place. If
    /// that `Viaduct` wraps a different backend, `config.http_backend` is
    /// ignored and a warning is logged.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InitializationFailed` if the tracing subscriber
    /// cannot be installed, for instance because the host set its own.
    /// Backend activation failures are absorbed by [`Viaduct::initialize`].
    pub fn bootstrap(config: BridgeConfig) -> Result<Self> {
        if let Some(logging_config) = config.logging.clone() {
            if logging::is_logging_initialized() {
                debug!("Tracing subscriber already installed, keeping it");
            } else {
                logging::init_logging(logging_config)
                    .map_err(|e| CoreError::InitializationFailed(e.to_string()))?;
            }
        }

        let forwarder = Arc::new(ForwardOnLog::new(Arc::clone(&config.host_logger)));
        logging::set_logger(Some(forwarder.clone()));
        logging::set_max_level(config.forward_max_level);

        let viaduct = Viaduct::install(Viaduct::new(
            Arc::clone(&config.http_backend),
            config.error_reporter.clone(),
        ));
        if !viaduct.uses_backend(&config.http_backend) {
            warn!(
                "Configured HTTP backend ignored: the installed Viaduct wraps another backend"
            );
        }
        viaduct.initialize(&config.user_agent);

        info!(
            forward_max_level = ?config.forward_max_level,
            backend_active = viaduct.is_activated(),
            "Bridge bootstrapped"
        );

        Ok(Self {
            config: Arc::new(config),
            viaduct,
            forwarder,
        })
    }

    /// Build the configuration and bootstrap in one step.
    pub fn bootstrap_with(builder: BridgeConfigBuilder) -> Result<Self> {
        Self::bootstrap(builder.build()?)
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// The process-wide backend initializer.
    pub fn viaduct(&self) -> Arc<Viaduct> {
        Arc::clone(&self.viaduct)
    }

    /// The forwarder registered with the native logging subsystem.
    pub fn forwarder(&self) -> Arc<ForwardOnLog> {
        Arc::clone(&self.forwarder)
    }

    /// The backend the installed `Viaduct` activates.
    pub fn http_backend(&self) -> Arc<dyn HttpBackend> {
        self.viaduct.backend()
    }

    /// Stop delivering native log records to the host.
    pub fn detach_logger(&self) {
        logging::set_logger(None);
    }
}
