use crate::config::AlertConfig;
use crate::session_registry::SessionRegistry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Process-wide detection settings and the live camera sessions. Config
/// edits are read at the start of the next cycle.
pub struct DetectionContext {
    pub registry: Arc<SessionRegistry>,
    alert: Mutex<AlertConfig>,
    test_mode: AtomicBool,
}

impl DetectionContext {
    pub fn new(registry: Arc<SessionRegistry>, alert: AlertConfig, test_mode: bool) -> Self {
        Self {
            registry,
            alert: Mutex::new(alert),
            test_mode: AtomicBool::new(test_mode),
        }
    }

    pub fn alert_config(&self) -> AlertConfig {
        *self.alert.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_alert_config(&self, alert: AlertConfig) {
        *self.alert.lock().unwrap_or_else(PoisonError::into_inner) = alert;
    }

    pub fn test_mode(&self) -> bool {
        self.test_mode.load(Ordering::SeqCst)
    }

    /// Returns the previous value.
    pub fn set_test_mode(&self, on: bool) -> bool {
        self.test_mode.swap(on, Ordering::SeqCst)
    }
}
