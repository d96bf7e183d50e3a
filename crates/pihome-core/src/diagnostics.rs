//! Diagnostics collaborator
//!
//! Windowing and rendering layers report failures through a [`Diagnostics`]
//! handle passed in at bootstrap instead of a process-wide error callback.
//! Production code uses [`LogDiagnostics`]; tests can record what was
//! reported with [`RecordingDiagnostics`].

use std::sync::{Arc, Mutex};

use log::error;

pub trait Diagnostics: Send + Sync {
    /// Report a non-fatal failure from `source` (e.g. "display", "window").
    fn report(&self, source: &str, message: &str);
}

/// Forwards every report to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&self, source: &str, message: &str) {
        error!("[{}] {}", source, message);
    }
}

/// Keeps every report in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingDiagnostics {
    reports: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<(String, String)> {
        self.reports
            .lock()
            .map(|reports| reports.clone())
            .unwrap_or_default()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn report(&self, source: &str, message: &str) {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push((source.to_string(), message.to_string()));
        }
    }
}
