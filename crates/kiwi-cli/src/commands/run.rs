//! `kiwi-bind run` — Set up a build root, run a command in it, clean up.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, bail};
use clap::Args;
use kiwi_common::types::BuildRoot;
use kiwi_core::root_bind::RootBind;

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Build root directory.
    #[arg(long, env = "KIWI_BUILD_ROOT")]
    pub root: PathBuf,

    /// Skip the host tool check.
    #[arg(long)]
    pub skip_preflight: bool,

    /// Command to run chrooted into the build root.
    #[arg(trailing_var_arg = true, required = true)]
    pub command: Vec<String>,
}

/// Executes the `run` command.
///
/// The build root is always cleaned up, whether the chrooted command
/// succeeds or not.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, a host tool is
/// missing, setup fails, or the command exits unsuccessfully.
pub fn execute(args: RunArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let config = super::load_config(config)?;
    if !args.skip_preflight {
        kiwi_core::preflight::check_host_tools()?;
    }

    let mut bind = RootBind::new(BuildRoot::new(&args.root), config);
    bind.setup()
        .with_context(|| format!("preparing build root {}", args.root.display()))?;

    tracing::info!(root = %args.root.display(), cmd = ?args.command, "running in build root");
    let status = Command::new("chroot")
        .arg(bind.root().path())
        .args(&args.command)
        .status();
    bind.cleanup();

    let status = status.context("failed to execute chroot")?;
    if !status.success() {
        bail!(
            "command {:?} failed in build root (exit code {})",
            args.command,
            status.code().unwrap_or(-1)
        );
    }
    Ok(())
}
