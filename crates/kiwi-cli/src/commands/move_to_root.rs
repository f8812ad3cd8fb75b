//! `kiwi-bind move-to-root` — Rewrite host paths to in-root paths.

use std::path::PathBuf;

use clap::Args;
use kiwi_common::types::BuildRoot;

/// Arguments for the `move-to-root` command.
#[derive(Args, Debug)]
pub struct MoveToRootArgs {
    /// Build root directory.
    #[arg(long, env = "KIWI_BUILD_ROOT")]
    pub root: PathBuf,

    /// Host paths below the build root.
    #[arg(required = true)]
    pub paths: Vec<String>,
}

/// Executes the `move-to-root` command.
///
/// # Errors
///
/// Never fails; the signature matches the other command handlers.
#[allow(clippy::unnecessary_wraps, clippy::print_stdout)]
pub fn execute(args: &MoveToRootArgs) -> anyhow::Result<()> {
    let root = BuildRoot::new(&args.root);
    for path in kiwi_core::root_bind::move_to_root(&root, &args.paths) {
        println!("{path}");
    }
    Ok(())
}
