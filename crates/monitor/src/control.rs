//! External control surface
//!
//! Start/stop are mutually exclusive, idempotent-safe transitions; the loop
//! simply reads the flag each iteration. Settings are mutable at any time
//! through the same shared handle. State mutation of the pipeline itself
//! stays on the loop's single thread.

use drowsiness::Settings;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Debug, Default)]
struct ControlInner {
    monitoring: AtomicBool,
    settings: Mutex<Settings>,
}

/// Cloneable handle shared between the control input and the loop.
#[derive(Debug, Clone, Default)]
pub struct ControlSurface {
    inner: Arc<ControlInner>,
}

impl ControlSurface {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(ControlInner {
                monitoring: AtomicBool::new(false),
                settings: Mutex::new(settings.clamped()),
            }),
        }
    }

    /// Begin monitoring; a no-op when already monitoring.
    pub fn start_monitoring(&self) {
        if !self.inner.monitoring.swap(true, Ordering::SeqCst) {
            info!("Control: start monitoring");
        }
    }

    /// Stop monitoring; a no-op when already stopped.
    pub fn stop_monitoring(&self) {
        if self.inner.monitoring.swap(false, Ordering::SeqCst) {
            info!("Control: stop monitoring");
        }
    }

    pub fn is_monitoring(&self) -> bool {
        self.inner.monitoring.load(Ordering::SeqCst)
    }

    /// Whether the start action is currently enabled.
    pub fn can_start(&self) -> bool {
        !self.is_monitoring()
    }

    /// Whether the stop action is currently enabled.
    pub fn can_stop(&self) -> bool {
        self.is_monitoring()
    }

    /// Current settings (copied out; the handle never leaks the lock).
    pub fn settings(&self) -> Settings {
        *self.inner.settings.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace the settings, clamping slider ranges.
    pub fn set_settings(&self, settings: Settings) {
        let mut guard = self.inner.settings.lock().unwrap_or_else(|e| e.into_inner());
        *guard = settings.clamped();
    }
}
