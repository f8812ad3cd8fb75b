//! Host filesystem probes.

use std::path::Path;

/// Read-only existence queries against the host filesystem.
pub trait HostFs {
    /// Returns whether `path` exists, following symlinks.
    fn exists(&self, path: &Path) -> bool;
}

/// Probe backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFs;

impl HostFs for RealFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
