//! Bootstrap wiring tests: native records reach the host logger and the
//! backend is activated once, through the process-wide registry.

use bridge_traits::{
    error::Result as BridgeResult, BridgeError, HttpBackend, HttpRequest, HttpResponse, Level,
    Logger, LoggerCategory, LoggerLevel, Record,
};
use core_runtime::config::BridgeConfig;
use core_runtime::logging::global_registry;
use core_service::{CoreService, Viaduct};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

type HostCall = (String, LoggerLevel, LoggerCategory, HashMap<String, String>);

#[derive(Default)]
struct RecordingLogger {
    calls: Mutex<Vec<HostCall>>,
}

impl Logger for RecordingLogger {
    fn log(
        &self,
        message: &str,
        level: LoggerLevel,
        category: LoggerCategory,
        extra: HashMap<String, String>,
    ) {
        self.calls
            .lock()
            .unwrap()
            .push((message.to_string(), level, category, extra));
    }
}

#[derive(Default)]
struct CountingBackend {
    user_agent: Mutex<Option<String>>,
    activations: AtomicUsize,
}

#[async_trait::async_trait]
impl HttpBackend for CountingBackend {
    fn set_default_user_agent(&self, user_agent: &str) {
        *self.user_agent.lock().unwrap() = Some(user_agent.to_string());
    }

    fn default_user_agent(&self) -> Option<String> {
        self.user_agent.lock().unwrap().clone()
    }

    fn activate(&self) -> BridgeResult<()> {
        if self.activations.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(())
        } else {
            Err(BridgeError::AlreadyInitialized)
        }
    }

    fn is_active(&self) -> bool {
        self.activations.load(Ordering::SeqCst) > 0
    }

    async fn send(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
        Err(BridgeError::NotInitialized)
    }
}

// Registry and Viaduct are process-wide; keep every step in one test.
#[test]
fn test_bootstrap_wires_forwarder_and_viaduct() {
    let logger = Arc::new(RecordingLogger::default());
    let backend = Arc::new(CountingBackend::default());

    let config = BridgeConfig::builder()
        .user_agent("Firefox-iOS/148.0")
        .host_logger(logger.clone())
        .http_backend(backend.clone())
        .forward_max_level(Level::Info)
        .build()
        .unwrap();
    let core = CoreService::bootstrap(config).unwrap();

    assert!(core.viaduct().is_activated());
    assert_eq!(backend.activations.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(
        &core.viaduct(),
        &Viaduct::try_shared().expect("viaduct installed")
    ));

    // Native side emits through the registry.
    let registry = global_registry();
    assert!(!registry.dispatch(Record::new(Level::Debug, "sync_manager", "below threshold")));
    assert!(registry.dispatch(Record::new(Level::Warn, "sync_manager", "sync failed")));
    assert!(registry.dispatch(Record::new(Level::Error, "logins", "decrypt failed")));

    // A second bootstrap keeps the installed Viaduct but applies the new agent.
    let second = CoreService::bootstrap_with(
        BridgeConfig::builder()
            .user_agent("Firefox-iOS/149.0")
            .host_logger(logger.clone())
            .http_backend(Arc::new(CountingBackend::default())),
    )
    .unwrap();
    assert!(Arc::ptr_eq(&core.viaduct(), &second.viaduct()));
    assert_eq!(backend.activations.load(Ordering::SeqCst), 1);
    assert_eq!(backend.default_user_agent(), Some("Firefox-iOS/149.0".to_string()));

    second.detach_logger();
    assert!(!registry.dispatch(Record::new(Level::Error, "logins", "after detach")));

    let calls = logger.calls.lock().unwrap();
    assert_eq!(
        calls.as_slice(),
        &[
            (
                "sync failed".to_string(),
                LoggerLevel::Warning,
                LoggerCategory::Sync,
                HashMap::from([("target".to_string(), "sync_manager".to_string())]),
            ),
            (
                "decrypt failed".to_string(),
                LoggerLevel::Warning,
                LoggerCategory::Sync,
                HashMap::from([("target".to_string(), "logins".to_string())]),
            ),
        ]
    );
}
