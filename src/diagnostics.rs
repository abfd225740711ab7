/*!
 * Diagnostic sinks receiving store failures before they reach the caller.
 */

use log::error;
use parking_lot::Mutex;

use crate::errors::StoreError;

/// Receives every failure the store surfaces
pub trait DiagnosticSink: Send + Sync {
    /// Report a failed operation. Called before the error is returned.
    fn report(&self, operation: &str, error: &StoreError);
}

/// Default sink writing through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, operation: &str, error: &StoreError) {
        error!("{} failed: {}", operation, error);
    }
}

/// A failure captured by [`MemorySink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub operation: String,
    pub error: StoreError,
}

/// Sink that keeps every report in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    reports: Mutex<Vec<Report>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the reports received so far, oldest first
    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.reports.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.lock().is_empty()
    }

    pub fn clear(&self) {
        self.reports.lock().clear();
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, operation: &str, error: &StoreError) {
        self.reports.lock().push(Report {
            operation: operation.to_string(),
            error: error.clone(),
        });
    }
}
