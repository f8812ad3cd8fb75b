//! # kiwi-core
//!
//! Build-root bind management for image builds.
//!
//! This crate provides:
//! - **Root bind**: bind mounts of host kernel filesystems and the shared
//!   cache into a build root, config files staged by copy plus symlink, and
//!   a strictly ordered, best-effort teardown of all of it.
//! - **Command execution**: the [`command::CommandRunner`] seam every mount,
//!   copy, and removal goes through.
//! - **Host probes**: file existence checks and the host tool preflight.
//!
//! External collaborators are injected as trait objects so the ordering of
//! issued commands can be asserted without touching the host mount table.

pub mod command;
pub mod host;
pub mod preflight;
pub mod root_bind;
pub mod sink;
