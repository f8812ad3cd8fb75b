//! `kiwi-bind preflight` — Report missing host tools.

use anyhow::bail;
use clap::Args;

/// Arguments for the `preflight` command.
#[derive(Args, Debug)]
pub struct PreflightArgs {}

/// Executes the `preflight` command.
///
/// # Errors
///
/// Returns an error naming every missing tool.
#[allow(clippy::print_stdout)]
pub fn execute(_args: &PreflightArgs) -> anyhow::Result<()> {
    let missing = kiwi_core::preflight::missing_tools();
    if !missing.is_empty() {
        bail!("missing host tools: {}", missing.join(", "));
    }
    println!("all host tools available");
    Ok(())
}
