//! `kiwi-bind show-config` — Print the effective configuration.

use std::path::Path;

use clap::Args;

/// Arguments for the `show-config` command.
#[derive(Args, Debug)]
pub struct ShowConfigArgs {
    /// Emit compact single-line JSON.
    #[arg(long)]
    pub compact: bool,
}

/// Executes the `show-config` command.
///
/// # Errors
///
/// Returns an error if the configuration file cannot be loaded.
#[allow(clippy::print_stdout)]
pub fn execute(args: &ShowConfigArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let config = super::load_config(config)?;
    let json = if args.compact {
        serde_json::to_string(&config)?
    } else {
        serde_json::to_string_pretty(&config)?
    };
    println!("{json}");
    Ok(())
}
