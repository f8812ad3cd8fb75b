//! # kiwi-common
//!
//! Shared types, error definitions, configuration models, and constants
//! used across the kiwi bind workspace.
//!
//! This crate is the leaf of the dependency graph: it depends on no other
//! internal crate and provides the primitives the bind manager and the CLI
//! build upon.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
