//! Reporting of non-fatal per-property failures.

use std::sync::Mutex;

use crate::error::SpecimenError;

/// Collaborator that receives per-property failures under the lenient policy.
pub trait Reporter: Send + Sync {
    /// Report a plain message
    fn message(&self, message: &str);

    /// Report a synthesis error
    fn error(&self, error: &SpecimenError) {
        self.message(&error.to_string());
    }
}

// Lets a caller keep a handle on a reporter that was handed to a provider.
impl<R: Reporter + ?Sized> Reporter for std::sync::Arc<R> {
    fn message(&self, message: &str) {
        (**self).message(message);
    }

    fn error(&self, error: &SpecimenError) {
        (**self).error(error);
    }
}

/// Default reporter backed by the `log` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn message(&self, message: &str) {
        log::warn!("{}", message);
    }

    fn error(&self, error: &SpecimenError) {
        log::warn!("property synthesis failed: {}", error);
    }
}

/// Reporter that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn message(&self, _message: &str) {}
}

/// Reporter that records messages in memory, for assertions in tests
#[derive(Debug, Default)]
pub struct MemoryReporter {
    entries: Mutex<Vec<String>>,
}

impl MemoryReporter {
    /// Create a new empty memory reporter
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded messages
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of recorded messages
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Check whether nothing has been reported
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Reporter for MemoryReporter {
    fn message(&self, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_reporter_records_messages() {
        let reporter = MemoryReporter::new();
        assert!(reporter.is_empty());

        reporter.message("first");
        reporter.error(&SpecimenError::invalid_argument("second"));

        let entries = reporter.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], "first");
        assert!(entries[1].contains("second"));
    }

    #[test]
    fn test_null_reporter_discards() {
        // Just exercise the paths; nothing observable
        NullReporter.message("ignored");
        NullReporter.error(&SpecimenError::invalid_argument("ignored"));
    }
}
