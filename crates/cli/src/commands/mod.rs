//! Subcommand implementations.

pub mod compute;
pub mod migrate;
