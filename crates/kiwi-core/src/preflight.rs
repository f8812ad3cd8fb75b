//! Host tool availability checks.
//!
//! The bind manager shells out for every operation, so a missing `mountpoint`
//! or `rmdir` only surfaces halfway through a teardown. Checking up front
//! turns that into a clear error before anything is mounted.

use kiwi_common::constants::REQUIRED_HOST_TOOLS;
use kiwi_common::error::{KiwiError, Result};

/// Returns the required host tools that cannot be found on `PATH`.
#[must_use]
pub fn missing_tools() -> Vec<&'static str> {
    missing_from(REQUIRED_HOST_TOOLS)
}

/// Returns the entries of `tools` that cannot be found on `PATH`.
#[must_use]
pub fn missing_from(tools: &[&'static str]) -> Vec<&'static str> {
    tools
        .iter()
        .copied()
        .filter(|tool| which::which(tool).is_err())
        .collect()
}

/// Fails if any required host tool is missing.
///
/// # Errors
///
/// Returns [`KiwiError::Config`] listing every missing tool.
pub fn check_host_tools() -> Result<()> {
    let missing = missing_tools();
    if missing.is_empty() {
        tracing::debug!("all host tools available");
        return Ok(());
    }
    Err(KiwiError::Config {
        message: format!("missing host tools: {}", missing.join(", ")),
    })
}
