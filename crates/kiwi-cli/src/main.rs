//! # kiwi-bind
//!
//! Prepares an image build root with bind-mounted kernel filesystems, the
//! shared package cache, and staged host config, runs a command inside it,
//! and tears everything down again.

mod commands;

use clap::Parser;

use crate::commands::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
        )
        .init();

    let cli = Cli::parse();
    commands::execute(cli)
}
