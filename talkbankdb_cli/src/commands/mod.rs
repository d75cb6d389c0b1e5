//! CLI subcommand implementations.

pub mod paths;
pub mod query;
