//! CLI command definitions and dispatch.

pub mod move_to_root;
pub mod preflight;
pub mod run;
pub mod show_config;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use kiwi_common::config::BindConfig;
use kiwi_common::constants::BIN_NAME;

/// kiwi-bind — Build-root bind mount manager.
#[derive(Parser, Debug)]
#[command(name = BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// JSON file overriding the default bind configuration.
    #[arg(long, global = true, env = "KIWI_BIND_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Set up a build root, run a command chrooted into it, and clean up.
    Run(run::RunArgs),
    /// Rewrite host paths under a build root to their in-root form.
    MoveToRoot(move_to_root::MoveToRootArgs),
    /// Print the effective bind configuration as JSON.
    ShowConfig(show_config::ShowConfigArgs),
    /// Check that every host tool the bind manager needs is installed.
    Preflight(preflight::PreflightArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config.as_deref();
    match cli.command {
        Command::Run(args) => run::execute(args, config),
        Command::MoveToRoot(args) => move_to_root::execute(&args),
        Command::ShowConfig(args) => show_config::execute(&args, config),
        Command::Preflight(args) => preflight::execute(&args),
    }
}

/// Loads the configuration file if one was given, else the defaults.
fn load_config(path: Option<&Path>) -> anyhow::Result<BindConfig> {
    let Some(path) = path else {
        return Ok(BindConfig::default());
    };
    tracing::debug!(path = %path.display(), "loading bind configuration");
    Ok(BindConfig::load(path)?)
}
