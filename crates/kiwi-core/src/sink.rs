//! Warning sink for tolerated teardown failures.
//!
//! Cleanup never fails; it reports what it could not undo through a
//! [`WarningSink`] so callers and tests can observe it.

/// Receives warning-level messages.
pub trait WarningSink {
    /// Records one warning.
    fn warning(&self, message: &str);
}

/// Sink that forwards every warning to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warning(&self, message: &str) {
        tracing::warn!("{message}");
    }
}
