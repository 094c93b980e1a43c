//! Bridge bootstrap demonstration
//!
//! Brings the bridge up with desktop defaults, emits native log events that
//! get forwarded to the console host logger, and optionally fetches a URL
//! through the activated backend.
//!
//! Run with:
//! ```bash
//! # Forward everything from debug upwards
//! cargo run -p core-service --example bootstrap_demo
//!
//! # Also fetch a URL through the native backend
//! cargo run -p core-service --example bootstrap_demo -- https://example.com
//! ```

use bridge_traits::{ConsoleLogger, HttpBackend, Level, LoggerLevel};
use core_runtime::config::BridgeConfig;
use core_runtime::logging::{LogFormat, LoggingConfig};
use core_service::CoreService;
use std::env;
use std::sync::Arc;
use tracing::{debug, error, info, span, trace, warn};

#[tokio::main]
async fn main() {
    let url = env::args().nth(1);

    let config = BridgeConfig::builder()
        .user_agent("bridge-demo/0.1.0 (desktop)")
        .host_logger(Arc::new(ConsoleLogger::new(LoggerLevel::Debug)))
        .forward_max_level(Level::Debug)
        .logging(
            LoggingConfig::default()
                .with_format(LogFormat::Compact)
                .with_level(Level::Trace),
        )
        .build()
        .expect("Failed to build bridge config");

    let core = CoreService::bootstrap(config).expect("Failed to bootstrap bridge");

    // Repeat initialization is absorbed.
    core.viaduct().initialize("bridge-demo/0.1.1 (desktop)");
    info!(
        user_agent = ?core.viaduct().user_agent(),
        "Viaduct initialized twice"
    );

    demo_log_levels();

    if let Some(url) = url {
        match core.http_backend().get(&url).await {
            Ok(response) => info!(status = response.status, bytes = response.body.len(), "Fetched"),
            Err(err) => error!(error = %err, "Fetch failed"),
        }
    }
}

fn demo_log_levels() {
    let span = span!(tracing::Level::INFO, "sync_manager");
    let _enter = span.enter();

    trace!(target: "sync_manager", "Forwarded as DEBUG");
    debug!(target: "sync_manager", "Forwarded as DEBUG");
    info!(target: "sync_manager", "Forwarded as INFO");
    warn!(target: "sync_manager", "Forwarded as WARNING");
    error!(target: "sync_manager", engine = "history", "Forwarded as WARNING too");
}
