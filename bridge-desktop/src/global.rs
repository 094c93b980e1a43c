//! Process-global HTTP backend.
//!
//! Free functions over a single lazily-created [`ReqwestBackend`], matching
//! the shape of the native component's exported API.

use bridge_traits::{error::Result, http::HttpBackend};
use std::sync::{Arc, OnceLock};

use crate::http::ReqwestBackend;

static GLOBAL_BACKEND: OnceLock<Arc<ReqwestBackend>> = OnceLock::new();

/// The process-wide backend, created on first access.
pub fn global_backend() -> Arc<ReqwestBackend> {
    Arc::clone(GLOBAL_BACKEND.get_or_init(|| Arc::new(ReqwestBackend::new())))
}

/// Install `backend` as the process-wide backend unless one already exists.
///
/// Returns whichever backend ended up installed.
pub fn install_global_backend(backend: ReqwestBackend) -> Arc<ReqwestBackend> {
    Arc::clone(GLOBAL_BACKEND.get_or_init(|| Arc::new(backend)))
}

/// Set the user agent used by every request that does not set its own.
pub fn set_global_default_user_agent(user_agent: &str) {
    global_backend().set_default_user_agent(user_agent);
}

/// Activate the process-wide HTTP engine.
///
/// Fails with `BridgeError::AlreadyInitialized` on every call after the first
/// success.
pub fn init_backend() -> Result<()> {
    global_backend().activate()
}
