//! Process-wide authority for native HTTP backend activation.
//!
//! [`Viaduct`] sets the backend's default user agent on every call and
//! activates the engine at most once. Repeat activations are expected and
//! absorbed; any other activation failure is reported to the host's error
//! pipeline and never returned to the caller.

use bridge_traits::{BridgeError, ErrorReport, ErrorReporter, HttpBackend, LoggerCategory};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::{debug, error};

static SHARED: OnceLock<Arc<Viaduct>> = OnceLock::new();

/// Backend initializer.
///
/// Construct one with [`Viaduct::new`] and share it by handle, or go through
/// the process-wide instance ([`Viaduct::install`] / [`Viaduct::shared`]).
pub struct Viaduct {
    backend: Arc<dyn HttpBackend>,
    reporter: Option<Arc<dyn ErrorReporter>>,
    activated: AtomicBool,
}

impl std::fmt::Debug for Viaduct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viaduct")
            .field("backend", &"HttpBackend { ... }")
            .field("reporter", &self.reporter.as_ref().map(|_| "ErrorReporter { ... }"))
            .field("activated", &self.is_activated())
            .finish()
    }
}

impl Viaduct {
    pub fn new(backend: Arc<dyn HttpBackend>, reporter: Option<Arc<dyn ErrorReporter>>) -> Self {
        Self {
            backend,
            reporter,
            activated: AtomicBool::new(false),
        }
    }

    /// Make `viaduct` the process-wide instance unless one already exists.
    ///
    /// Returns whichever instance is installed; the first one wins.
    pub fn install(viaduct: Viaduct) -> Arc<Viaduct> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(viaduct)))
    }

    /// The process-wide instance, if one has been installed.
    pub fn try_shared() -> Option<Arc<Viaduct>> {
        SHARED.get().cloned()
    }

    /// The process-wide instance, created on first access over the desktop
    /// global backend.
    #[cfg(feature = "desktop-shims")]
    pub fn shared() -> Arc<Viaduct> {
        Arc::clone(SHARED.get_or_init(|| {
            Arc::new(Viaduct::new(
                bridge_desktop::global_backend(),
                Some(Arc::new(bridge_traits::ConsoleErrorReporter)),
            ))
        }))
    }

    /// Apply `user_agent` and activate the backend if nobody has yet.
    ///
    /// Safe to call any number of times from any thread. The user agent is
    /// always applied (last write wins); only the first activation attempt
    /// reaches the backend. A call that loses the race returns without
    /// waiting for the winner to finish activating.
    pub fn initialize(&self, user_agent: &str) {
        self.backend.set_default_user_agent(user_agent);

        if self
            .activated
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        match self.backend.activate() {
            Ok(()) => debug!(user_agent = %user_agent, "Native HTTP backend activated"),
            Err(BridgeError::AlreadyInitialized) => {}
            Err(err) => {
                // Allow a later call to retry activation.
                self.activated.store(false, Ordering::Release);
                error!(error = %err, "Native HTTP backend activation failed");

                if let Some(reporter) = &self.reporter {
                    reporter.report(
                        ErrorReport::new(LoggerCategory::Setup, err.to_string())
                            .with_extra("user_agent", user_agent),
                    );
                }
            }
        }
    }

    /// Whether an activation attempt has been claimed and not failed.
    pub fn is_activated(&self) -> bool {
        self.activated.load(Ordering::Acquire)
    }

    /// The user agent currently applied to the backend.
    pub fn user_agent(&self) -> Option<String> {
        self.backend.default_user_agent()
    }

    pub fn backend(&self) -> Arc<dyn HttpBackend> {
        Arc::clone(&self.backend)
    }

    /// Whether `backend` is the very instance this initializer activates.
    pub fn uses_backend(&self, backend: &Arc<dyn HttpBackend>) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.backend), Arc::as_ptr(backend))
    }
}
