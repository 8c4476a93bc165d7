//! CLI module for tooltrack - command-line interface and subcommands.
//!
//! Every board operation is one subcommand; `serve` runs the REST back end.

pub mod commands;

pub use commands::Cli;
